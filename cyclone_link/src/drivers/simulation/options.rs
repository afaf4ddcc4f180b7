//! Simulation driver options, read from `[link.driver_config.simulation]`.

use cyclone_common::consts::DEVICE_ADDRESS;
use cyclone_common::transport::TransportError;
use serde::Deserialize;
use std::time::Duration;

/// Behaviour knobs of the simulated actuator.
///
/// # TOML Example
///
/// ```toml
/// [link.driver_config.simulation]
/// visible_devices = ["E2:4D:31:4C:FE:26"]
/// discovery_delay_ms = 200
/// refuse_connection = false
/// send_latency_ms = 2
/// fail_every_nth_send = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationOptions {
    /// Addresses discovery can see.
    pub visible_devices: Vec<String>,
    /// Time discovery takes to find a visible device.
    pub discovery_delay_ms: u64,
    /// Found devices refuse the connection.
    pub refuse_connection: bool,
    /// Time every write takes.
    pub send_latency_ms: u64,
    /// Every Nth write fails (0 = never).
    pub fail_every_nth_send: u32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            visible_devices: vec![DEVICE_ADDRESS.to_string()],
            discovery_delay_ms: 200,
            refuse_connection: false,
            send_latency_ms: 0,
            fail_every_nth_send: 0,
        }
    }
}

impl SimulationOptions {
    /// Parse options from the driver's TOML section; `None` yields defaults.
    ///
    /// # Errors
    /// `TransportError::ConfigError` when the section has unknown or mistyped keys.
    pub fn from_section(section: Option<&toml::Value>) -> Result<Self, TransportError> {
        match section {
            Some(value) => value
                .clone()
                .try_into()
                .map_err(|e| TransportError::ConfigError(format!("simulation: {e}"))),
            None => Ok(Self::default()),
        }
    }

    /// Discovery delay as `Duration`.
    pub fn discovery_delay(&self) -> Duration {
        Duration::from_millis(self.discovery_delay_ms)
    }

    /// Write latency as `Duration`.
    pub fn send_latency(&self) -> Duration {
        Duration::from_millis(self.send_latency_ms)
    }
}
