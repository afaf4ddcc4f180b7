//! Simulated actuator state and the probe used to inspect it.
//!
//! The state lives behind an `Arc<Mutex<_>>` shared by the driver and any
//! number of `ActuatorProbe` clones, so tests can watch what the controller
//! wrote and inject link faults while the driver is owned by the scheduler.

use cyclone_common::command::{CommandPacket, CommandState, Direction, PacketError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Everything the simulated device knows about itself.
#[derive(Debug, Default)]
pub struct ActuatorState {
    /// Session open.
    pub connected: bool,
    /// Last decoded command.
    pub commanded: CommandState,
    /// Every packet accepted, in order.
    pub packets: Vec<CommandPacket>,
    /// Forward↔Reverse transitions seen (stops in between are ignored).
    pub reversals: u64,
    /// Successful connects.
    pub connects: u64,
    /// Writes that failed.
    pub send_failures: u64,
    /// Writes attempted while connected.
    pub send_attempts: u64,
    /// Hide the device from discovery regardless of options.
    pub hidden: bool,
    /// Refuse connections regardless of options.
    pub refuse: bool,
    /// Number of upcoming writes that fail.
    pub pending_send_failures: u32,
    /// Writes block for this long (simulates a stalled radio).
    pub stall: Option<Duration>,
    /// Disconnect reports an error (state still goes to disconnected).
    pub fail_disconnect: bool,
    /// Disconnect never completes (the session stays open until reset).
    pub hang_disconnect: bool,
    last_rotation: Option<Direction>,
}

impl ActuatorState {
    /// Apply an accepted packet to the simulated motor.
    pub(super) fn apply(&mut self, packet: CommandPacket) -> Result<CommandState, PacketError> {
        let command = CommandPacket::decode(packet.as_bytes())?;

        if !command.is_stop() {
            if let Some(previous) = self.last_rotation {
                if previous != command.direction {
                    self.reversals += 1;
                }
            }
            self.last_rotation = Some(command.direction);
        }

        self.commanded = command;
        self.packets.push(packet);
        Ok(command)
    }
}

/// Cloneable handle onto a simulated actuator.
#[derive(Debug, Clone, Default)]
pub struct ActuatorProbe {
    inner: Arc<Mutex<ActuatorState>>,
}

impl ActuatorProbe {
    pub(super) fn with_state<R>(&self, f: impl FnOnce(&mut ActuatorState) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// All packets accepted so far.
    pub fn packets(&self) -> Vec<CommandPacket> {
        self.inner.lock().packets.clone()
    }

    /// Value bytes of all accepted packets.
    pub fn values(&self) -> Vec<u8> {
        self.inner.lock().packets.iter().map(|p| p.value()).collect()
    }

    /// Forget recorded packets.
    pub fn clear_packets(&self) {
        self.inner.lock().packets.clear();
    }

    /// Last decoded command.
    pub fn commanded(&self) -> CommandState {
        self.inner.lock().commanded
    }

    /// Direction reversals observed.
    pub fn reversals(&self) -> u64 {
        self.inner.lock().reversals
    }

    /// Session open.
    pub fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }

    /// Successful connects so far.
    pub fn connects(&self) -> u64 {
        self.inner.lock().connects
    }

    /// Failed writes so far.
    pub fn send_failures(&self) -> u64 {
        self.inner.lock().send_failures
    }

    /// Hide or reveal the device to discovery.
    pub fn set_hidden(&self, hidden: bool) {
        self.inner.lock().hidden = hidden;
    }

    /// Make found devices refuse connections.
    pub fn set_refuse(&self, refuse: bool) {
        self.inner.lock().refuse = refuse;
    }

    /// Fail the next `count` writes.
    pub fn fail_next_sends(&self, count: u32) {
        self.inner.lock().pending_send_failures = count;
    }

    /// Make every write block for `stall` (or stop stalling with `None`).
    pub fn stall_sends(&self, stall: Option<Duration>) {
        self.inner.lock().stall = stall;
    }

    /// Make disconnect report an error.
    pub fn set_fail_disconnect(&self, fail: bool) {
        self.inner.lock().fail_disconnect = fail;
    }

    /// Make disconnect block forever.
    pub fn hang_disconnect(&self, hang: bool) {
        self.inner.lock().hang_disconnect = hang;
    }

    /// Drop the session from the device side (radio out of range).
    pub fn drop_link(&self) {
        self.inner.lock().connected = false;
    }
}
