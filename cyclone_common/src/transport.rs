//! Transport port trait and error types.
//!
//! This module defines:
//! - `Transport` trait - Interface for pluggable link drivers
//! - `TransportError` enum - Error types for link operations
//! - `TransportFactory` type alias - Factory function type
//! - `TransportDiagnostics` struct - Optional driver diagnostics

use crate::command::CommandPacket;
use crate::config::LinkConfig;
use crate::types::DeviceId;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Error types for link operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Discovery did not see the device before its timeout.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Device was found but the connection could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A single command write failed.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Disconnect did not complete cleanly.
    #[error("Disconnect failed: {0}")]
    DisconnectFailed(String),

    /// Operation requires an open session.
    #[error("Not connected")]
    NotConnected,

    /// Operation exceeded its time bound.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Driver configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Driver not found in the registry.
    #[error("Driver not found: {0}")]
    DriverNotFound(String),
}

/// Factory function type for creating driver instances.
pub type TransportFactory = fn() -> Box<dyn Transport>;

/// Optional driver diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportDiagnostics {
    /// Successful connects.
    pub connects: u64,
    /// Packets written successfully.
    pub packets_sent: u64,
    /// Writes that failed.
    pub send_failures: u64,
    /// Driver-specific diagnostics (free text)
    pub custom: Option<String>,
}

/// Trait defining the interface for link drivers.
///
/// The control scheduler owns exactly one driver for the process lifetime and
/// drives it through this trait. The driver owns the session handle; there is
/// at most one open session at a time.
///
/// # Lifecycle
///
/// 1. `init()` - Called once after creation
/// 2. `connect()` - Discovery + connection
/// 3. `send()` - Once per tick, plus stop packets
/// 4. `disconnect()` - Best-effort close
/// 5. `reset_session()` - Local teardown when `disconnect()` was abandoned
///
/// # Timing Contracts
///
/// | Operation | Bound |
/// |-----------|-------|
/// | `connect()` | `discovery_timeout` for discovery, enforced by the driver |
/// | `send()` | unbounded here; the scheduler wraps it in a timeout |
/// | `disconnect()` | best-effort; the scheduler wraps it in a timeout |
/// | `reset_session()` | synchronous, must not block |
#[async_trait]
pub trait Transport: Send {
    /// Returns the driver's unique identifier (e.g. "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize the driver with link configuration.
    ///
    /// Driver should parse its own section from `config.driver_config`.
    ///
    /// # Errors
    /// Return `TransportError::ConfigError` if the section is malformed.
    fn init(&mut self, _config: &LinkConfig) -> Result<(), TransportError> {
        Ok(())
    }

    /// Discover `device` and open a session.
    ///
    /// # Errors
    /// - `DeviceNotFound` when discovery gives up after `discovery_timeout`
    /// - `ConnectionFailed` when the device refuses the connection
    async fn connect(
        &mut self,
        device: &DeviceId,
        discovery_timeout: Duration,
    ) -> Result<(), TransportError>;

    /// Write one command packet to the device's write characteristic.
    ///
    /// # Errors
    /// `NotConnected` without a session, `SendFailed` when the write fails.
    async fn send(&mut self, packet: &CommandPacket) -> Result<(), TransportError>;

    /// Close the session. Local state must read disconnected afterwards, even
    /// when an error is returned.
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Forget the session locally without talking to the device.
    ///
    /// Called when `disconnect()` was cancelled before it finished; afterwards
    /// `is_connected()` must return false so the next `connect()` opens a new
    /// session. Drivers without local session state keep the default.
    fn reset_session(&mut self) {}

    /// Whether a session is open and `send` may succeed.
    fn is_connected(&self) -> bool;

    /// Get driver-specific diagnostics.
    /// Default: None
    fn diagnostics(&self) -> Option<TransportDiagnostics> {
        None
    }
}
