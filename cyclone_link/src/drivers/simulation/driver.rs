//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `Transport` trait on top of a
//! software actuator: discovery honours the configured visible devices and
//! timeout, writes are decoded and applied, and faults can be injected through
//! the `ActuatorProbe`.

use super::actuator::ActuatorProbe;
use super::options::SimulationOptions;
use async_trait::async_trait;
use cyclone_common::command::CommandPacket;
use cyclone_common::config::LinkConfig;
use cyclone_common::transport::{Transport, TransportDiagnostics, TransportError};
use cyclone_common::types::DeviceId;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Simulation driver implementing the `Transport` trait.
pub struct SimulationDriver {
    /// Driver name
    name: &'static str,
    /// Driver version
    version: &'static str,
    /// Behaviour options
    options: SimulationOptions,
    /// Shared simulated device
    probe: ActuatorProbe,
}

impl SimulationDriver {
    /// Create a new simulation driver with default options.
    pub fn new() -> Self {
        Self::with_options(SimulationOptions::default())
    }

    /// Create a simulation driver with explicit options.
    pub fn with_options(options: SimulationOptions) -> Self {
        Self {
            name: "simulation",
            version: env!("CARGO_PKG_VERSION"),
            options,
            probe: ActuatorProbe::default(),
        }
    }

    /// Handle onto the simulated device.
    pub fn probe(&self) -> ActuatorProbe {
        self.probe.clone()
    }

    fn is_visible(&self, device: &DeviceId) -> bool {
        let hidden = self.probe.with_state(|s| s.hidden);
        !hidden && self.options.visible_devices.iter().any(|a| a == &device.address)
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for SimulationDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self, config: &LinkConfig) -> Result<(), TransportError> {
        self.options = SimulationOptions::from_section(config.driver_section(self.name))?;
        info!(
            "Simulation driver initialized: {} visible device(s), discovery {:?}, latency {:?}",
            self.options.visible_devices.len(),
            self.options.discovery_delay(),
            self.options.send_latency()
        );
        Ok(())
    }

    async fn connect(
        &mut self,
        device: &DeviceId,
        discovery_timeout: Duration,
    ) -> Result<(), TransportError> {
        if self.probe.is_connected() {
            debug!("Simulation: already connected to {}", device);
            return Ok(());
        }

        if !self.is_visible(device) {
            // Discovery scans for the full window before giving up.
            tokio::time::sleep(discovery_timeout).await;
            return Err(TransportError::DeviceNotFound(device.address.clone()));
        }

        let delay = self.options.discovery_delay();
        if delay > discovery_timeout {
            tokio::time::sleep(discovery_timeout).await;
            return Err(TransportError::DeviceNotFound(device.address.clone()));
        }
        tokio::time::sleep(delay).await;

        let refuse = self.options.refuse_connection || self.probe.with_state(|s| s.refuse);
        if refuse {
            return Err(TransportError::ConnectionFailed(format!(
                "{} refused the connection",
                device.address
            )));
        }

        self.probe.with_state(|s| {
            s.connected = true;
            s.connects += 1;
        });
        info!(
            "Simulation: connected to {} (characteristic {})",
            device.address, device.write_characteristic
        );
        Ok(())
    }

    async fn send(&mut self, packet: &CommandPacket) -> Result<(), TransportError> {
        let stall = self.probe.with_state(|s| s.stall);
        if !self.probe.is_connected() {
            return Err(TransportError::NotConnected);
        }

        let latency = stall.unwrap_or_else(|| self.options.send_latency());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let nth = self.options.fail_every_nth_send;
        self.probe.with_state(|s| {
            if !s.connected {
                return Err(TransportError::NotConnected);
            }
            s.send_attempts += 1;

            let scheduled_failure = nth > 0 && s.send_attempts % nth as u64 == 0;
            if s.pending_send_failures > 0 || scheduled_failure {
                s.pending_send_failures = s.pending_send_failures.saturating_sub(1);
                s.send_failures += 1;
                return Err(TransportError::SendFailed("simulated write failure".to_string()));
            }

            s.apply(*packet).map(|command| {
                debug!("Simulation: applied {} ({})", packet, command);
            })
            .map_err(|e| {
                s.send_failures += 1;
                TransportError::SendFailed(e.to_string())
            })
        })
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        if self.probe.with_state(|s| s.hang_disconnect) {
            debug!("Simulation: disconnect hanging");
            std::future::pending::<()>().await;
        }
        let fail = self.probe.with_state(|s| {
            s.connected = false;
            s.fail_disconnect
        });
        if fail {
            warn!("Simulation: disconnect reported an error");
            return Err(TransportError::DisconnectFailed(
                "simulated disconnect failure".to_string(),
            ));
        }
        info!("Simulation: disconnected");
        Ok(())
    }

    fn reset_session(&mut self) {
        self.probe.with_state(|s| s.connected = false);
        warn!("Simulation: session dropped locally");
    }

    fn is_connected(&self) -> bool {
        self.probe.is_connected()
    }

    fn diagnostics(&self) -> Option<TransportDiagnostics> {
        self.probe.with_state(|s| {
            Some(TransportDiagnostics {
                connects: s.connects,
                packets_sent: s.packets.len() as u64,
                send_failures: s.send_failures,
                custom: Some(format!("reversals={}", s.reversals)),
            })
        })
    }
}
