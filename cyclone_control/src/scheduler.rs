//! Control scheduler.
//!
//! Owns the transport for the process lifetime, the session state machine and
//! the running engine. Every operator command and every tick goes through
//! here; the presenter only ever sees the results.
//!
//! ## Send path
//! engine tick → `CommandPacket::encode` → `Transport::send` bounded by
//! `send_timeout`. A failed send is logged and shown on the telemetry line;
//! the next tick runs as scheduled.
//!
//! ## Teardown
//! `disconnect` and `shutdown` always send a courtesy stop first and always
//! end in `Disconnected`, whatever the link reports.

use crate::engine::ActiveEngine;
use crate::error::ControlError;
use crate::presentation::{ControlsView, Presenter, Severity, StatusUpdate, Telemetry};
use crate::rng::RandomSource;
use crate::state::session::{SessionEvent, SessionStateMachine, TransitionResult};
use cyclone_common::command::{CommandPacket, CommandState};
use cyclone_common::config::AppConfig;
use cyclone_common::consts::{DISCOVERY_TIMEOUT_MS, PERIODIC_TICK_MS, RANDOMIZER_TICK_MS, SEND_TIMEOUT_MS};
use cyclone_common::state::{ModeKind, SessionState};
use cyclone_common::transport::{Transport, TransportDiagnostics, TransportError};
use cyclone_common::types::DeviceId;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};

/// Extra time allowed on top of the discovery window for the connection itself.
const CONNECT_GRACE: Duration = Duration::from_secs(5);

/// Ticks between debug-level statistics dumps.
const STATS_LOG_INTERVAL: u64 = 100;

// ─── Timing ─────────────────────────────────────────────────────────

/// Cadences and time bounds used by the scheduler and its runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerTiming {
    /// Periodic engine cadence.
    pub periodic_tick: Duration,
    /// Randomizer cadence.
    pub randomizer_tick: Duration,
    /// Discovery window passed to `Transport::connect`.
    pub discovery_timeout: Duration,
    /// Bound on each `send` and on `disconnect`.
    pub send_timeout: Duration,
}

impl SchedulerTiming {
    /// Timing from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            periodic_tick: config.periodic_tick(),
            randomizer_tick: config.randomizer_tick(),
            discovery_timeout: config.link.discovery_timeout(),
            send_timeout: config.link.send_timeout(),
        }
    }

    /// Cadence of `kind`.
    pub const fn tick_interval(&self, kind: ModeKind) -> Duration {
        match kind {
            ModeKind::Periodic => self.periodic_tick,
            ModeKind::Randomizer => self.randomizer_tick,
        }
    }
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        Self {
            periodic_tick: Duration::from_millis(PERIODIC_TICK_MS),
            randomizer_tick: Duration::from_millis(RANDOMIZER_TICK_MS),
            discovery_timeout: Duration::from_millis(DISCOVERY_TIMEOUT_MS),
            send_timeout: Duration::from_millis(SEND_TIMEOUT_MS),
        }
    }
}

// ─── Statistics ─────────────────────────────────────────────────────

/// Tick and send statistics, O(1) per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Engine ticks executed.
    pub ticks: u64,
    /// Packets handed to the transport (ticks plus stops).
    pub sends: u64,
    /// Packets not delivered: failed sends, timeouts and packets skipped
    /// because the link had no session.
    pub failed_sends: u64,
    /// Sends that hit `send_timeout`.
    pub timeouts: u64,
    /// Slowest send [µs].
    pub max_send_us: u64,
    /// Sum of send durations [µs].
    pub total_send_us: u64,
    /// Undelivered packets since the last successful send.
    pub consecutive_failures: u64,
}

impl TickStats {
    /// Record one send attempt.
    pub fn record_send(&mut self, elapsed: Duration, result: &Result<(), TransportError>) {
        let us = elapsed.as_micros().min(u128::from(u64::MAX)) as u64;
        self.sends += 1;
        self.total_send_us += us;
        self.max_send_us = self.max_send_us.max(us);
        match result {
            Ok(()) => self.consecutive_failures = 0,
            Err(e) => {
                self.failed_sends += 1;
                self.consecutive_failures += 1;
                if matches!(e, TransportError::Timeout(_)) {
                    self.timeouts += 1;
                }
            }
        }
    }

    /// Record a packet dropped without calling the transport.
    pub fn record_skipped(&mut self) {
        self.failed_sends += 1;
        self.consecutive_failures += 1;
    }

    /// Average send duration [µs] (0 before the first send).
    pub fn avg_send_us(&self) -> u64 {
        if self.sends == 0 {
            0
        } else {
            self.total_send_us / self.sends
        }
    }
}

/// Outcome of one executed tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Engine output.
    pub command: CommandState,
    /// Packet handed to the transport.
    pub packet: CommandPacket,
    /// Send failure, if any.
    pub error: Option<TransportError>,
}

impl TickReport {
    /// The packet reached the device.
    pub const fn delivered(&self) -> bool {
        self.error.is_none()
    }
}

// ─── Scheduler ──────────────────────────────────────────────────────

/// Session owner and command dispatcher.
pub struct ControlScheduler {
    transport: Box<dyn Transport>,
    device: DeviceId,
    presenter: Arc<dyn Presenter>,
    rng: Box<dyn RandomSource>,
    session: SessionStateMachine,
    engine: Option<ActiveEngine>,
    timing: SchedulerTiming,
    stats: TickStats,
    last_error: Option<TransportError>,
}

impl ControlScheduler {
    /// Scheduler targeting the default device.
    pub fn new(
        transport: Box<dyn Transport>,
        presenter: Arc<dyn Presenter>,
        rng: Box<dyn RandomSource>,
        timing: SchedulerTiming,
    ) -> Self {
        let scheduler = Self {
            transport,
            device: DeviceId::default(),
            presenter,
            rng,
            session: SessionStateMachine::new(),
            engine: None,
            timing,
            stats: TickStats::default(),
            last_error: None,
        };
        scheduler.publish_controls();
        scheduler
    }

    /// Target a different device.
    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = device;
        self
    }

    // ── Accessors ──

    /// Current session state.
    #[inline]
    pub const fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Running engine, if any.
    pub fn active_mode(&self) -> Option<ModeKind> {
        self.engine.as_ref().map(ActiveEngine::kind)
    }

    /// Cadence of `kind`.
    pub const fn tick_interval(&self, kind: ModeKind) -> Duration {
        self.timing.tick_interval(kind)
    }

    /// Target device.
    pub const fn device(&self) -> &DeviceId {
        &self.device
    }

    /// Tick statistics so far.
    pub const fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Last connect failure, cleared on the next successful connect.
    pub const fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }

    /// Driver diagnostics, if the driver keeps any.
    pub fn transport_diagnostics(&self) -> Option<TransportDiagnostics> {
        self.transport.diagnostics()
    }

    // ── Operator commands ──

    /// Discover the device and open a session.
    ///
    /// # Errors
    /// - `InvalidTransition` unless `Disconnected`
    /// - `Transport(DeviceNotFound | ConnectionFailed | Timeout)` on failure,
    ///   with the session back in `Disconnected`
    pub async fn connect(&mut self) -> Result<(), ControlError> {
        self.transition(SessionEvent::Connect, "connect")?;
        self.publish_controls();
        self.status(format!("Searching for device... ({})", self.device.address), Severity::Pending);
        info!("Connecting to {}", self.device);

        let bound = self.timing.discovery_timeout + CONNECT_GRACE;
        let result = match timeout(
            bound,
            self.transport.connect(&self.device, self.timing.discovery_timeout),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(bound)),
        };

        match result {
            Ok(()) => {
                self.transition(SessionEvent::ConnectSucceeded, "connect")?;
                self.last_error = None;
                self.stats.consecutive_failures = 0;
                info!("Connected to {}", self.device.address);
                self.status("Connected", Severity::Success);
                self.publish_controls();
                Ok(())
            }
            Err(e) => {
                self.transition(SessionEvent::ConnectFailed, "connect")?;
                warn!("Connect to {} failed: {e}", self.device.address);
                let text = match &e {
                    TransportError::DeviceNotFound(_) => "Device not found".to_string(),
                    other => format!("Connection error: {other}"),
                };
                self.status(text, Severity::Error);
                self.last_error = Some(e.clone());
                self.publish_controls();
                Err(e.into())
            }
        }
    }

    /// Start an engine. The periodic engine draws its first reversal period
    /// from the current configuration.
    ///
    /// # Errors
    /// `InvalidTransition` unless `ConnectedIdle`.
    pub fn start_mode(&mut self, kind: ModeKind) -> Result<(), ControlError> {
        self.transition(SessionEvent::StartMode, "start")?;
        let config = self.presenter.periodic_config().clamped();
        self.engine = Some(ActiveEngine::start(kind, &config, self.rng.as_mut()));
        info!("{kind} mode started");
        self.status(format!("Running: {kind}"), Severity::Success);
        self.publish_controls();
        Ok(())
    }

    /// Stop the engine and send exactly one stop packet.
    ///
    /// A failed stop packet is logged and shown but does not fail the command.
    ///
    /// # Errors
    /// `InvalidTransition` unless `ConnectedActive`.
    pub async fn stop_mode(&mut self) -> Result<(), ControlError> {
        self.transition(SessionEvent::StopMode, "stop")?;
        let kind = self.active_mode();
        self.engine = None;

        match self.dispatch(CommandPacket::STOP).await {
            Ok(()) => {
                if let Some(kind) = kind {
                    info!("{kind} mode stopped");
                }
                self.status("Stopped", Severity::Info);
            }
            Err(e) => {
                warn!("Stop command failed: {e}");
                self.status(format!("Stop command failed: {e}"), Severity::Warning);
            }
        }
        self.presenter.show_telemetry(Telemetry {
            command: CommandState::STOP,
            steps_until_reversal: None,
            send_error: None,
        });
        self.publish_controls();
        Ok(())
    }

    /// Start or stop `kind` depending on the current state.
    ///
    /// # Errors
    /// `InvalidTransition` when not connected.
    pub async fn toggle_mode(&mut self, kind: ModeKind) -> Result<(), ControlError> {
        if self.state().is_active() {
            self.stop_mode().await
        } else {
            self.start_mode(kind)
        }
    }

    /// Courtesy stop, then close the session. Always ends `Disconnected`.
    ///
    /// # Errors
    /// `InvalidTransition` unless connected.
    pub async fn disconnect(&mut self) -> Result<(), ControlError> {
        self.transition(SessionEvent::Disconnect, "disconnect")?;
        self.engine = None;
        self.status("Disconnecting...", Severity::Pending);
        self.publish_controls();

        if let Err(e) = self.dispatch(CommandPacket::STOP).await {
            warn!("Courtesy stop before disconnect failed: {e}");
        }

        match timeout(self.timing.send_timeout, self.transport.disconnect()).await {
            Ok(Ok(())) => debug!("Transport disconnected"),
            Ok(Err(e)) => warn!("Disconnect error ignored: {e}"),
            Err(_) => {
                warn!("Disconnect timed out after {:?}", self.timing.send_timeout);
                self.transport.reset_session();
            }
        }

        self.transition(SessionEvent::DisconnectComplete, "disconnect")?;
        info!("Disconnected from {}", self.device.address);
        self.status("Not connected", Severity::Error);
        self.publish_controls();
        Ok(())
    }

    /// Process teardown: stop and disconnect when connected.
    pub async fn shutdown(&mut self) {
        if self.state().is_connected() {
            if let Err(e) = self.disconnect().await {
                warn!("Shutdown disconnect failed: {e}");
            }
        }
        info!(
            "Scheduler shutdown: ticks={}, sends={}, failed={}, timeouts={}, avg_send={}µs, max_send={}µs",
            self.stats.ticks,
            self.stats.sends,
            self.stats.failed_sends,
            self.stats.timeouts,
            self.stats.avg_send_us(),
            self.stats.max_send_us
        );
    }

    // ── Tick ──

    /// Run one engine tick and send its packet.
    ///
    /// Returns `None` (no draw, no send) unless `ConnectedActive`.
    pub async fn tick(&mut self) -> Option<TickReport> {
        if !self.session.allows_ticks() {
            return None;
        }
        let config = self.presenter.periodic_config().clamped();
        let engine = self.engine.as_mut()?;
        let command = engine.tick(&config, self.rng.as_mut());
        let steps_until_reversal = engine.steps_until_reversal();
        let packet = CommandPacket::encode(command);

        self.stats.ticks += 1;
        let was_failing = self.stats.consecutive_failures > 0;
        let error = self.dispatch(packet).await.err();

        match &error {
            Some(e) => {
                warn!("Tick {} send failed: {e}", self.stats.ticks);
                if !was_failing {
                    self.status(format!("Send failed: {e}"), Severity::Warning);
                }
            }
            None if was_failing => {
                info!("Sends recovered after tick {}", self.stats.ticks);
                self.status("Connected", Severity::Success);
            }
            None => {}
        }

        self.presenter.show_telemetry(Telemetry {
            command,
            steps_until_reversal,
            send_error: error.clone(),
        });

        if self.stats.ticks % STATS_LOG_INTERVAL == 0 {
            debug!(
                "Ticks: {}, failed sends: {}, timeouts: {}, avg send: {}µs, max send: {}µs",
                self.stats.ticks,
                self.stats.failed_sends,
                self.stats.timeouts,
                self.stats.avg_send_us(),
                self.stats.max_send_us
            );
        }

        Some(TickReport {
            command,
            packet,
            error,
        })
    }

    // ── Internals ──

    async fn dispatch(&mut self, packet: CommandPacket) -> Result<(), TransportError> {
        if !self.transport.is_connected() {
            self.stats.record_skipped();
            return Err(TransportError::NotConnected);
        }
        let started = Instant::now();
        let result = match timeout(self.timing.send_timeout, self.transport.send(&packet)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timing.send_timeout)),
        };
        self.stats.record_send(started.elapsed(), &result);
        if result.is_ok() {
            debug!("Sent {packet}");
        }
        result
    }

    fn transition(
        &mut self,
        event: SessionEvent,
        action: &'static str,
    ) -> Result<SessionState, ControlError> {
        match self.session.handle_event(event) {
            TransitionResult::Ok(state) => {
                debug!("Session → {state}");
                Ok(state)
            }
            TransitionResult::Rejected(reason) => {
                debug!("{action} rejected in {}: {reason}", self.session.state());
                Err(ControlError::InvalidTransition { action, reason })
            }
        }
    }

    fn status(&self, text: impl Into<String>, severity: Severity) {
        self.presenter.show_status(StatusUpdate::new(text, severity));
    }

    fn publish_controls(&self) {
        self.presenter
            .show_controls(ControlsView::for_state(self.session.state()));
    }
}

impl std::fmt::Debug for ControlScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlScheduler")
            .field("transport", &self.transport.name())
            .field("device", &self.device)
            .field("state", &self.session.state())
            .field("mode", &self.active_mode())
            .field("stats", &self.stats)
            .finish()
    }
}
