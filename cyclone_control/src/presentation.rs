//! Presentation adapter.
//!
//! The scheduler never renders anything itself: it reads the live
//! `PeriodicConfig` and pushes status, control availability and telemetry
//! through `Presenter`. The console panel is the shipped implementation.

use cyclone_common::command::CommandState;
use cyclone_common::state::SessionState;
use cyclone_common::transport::TransportError;
use cyclone_common::types::PeriodicConfig;
use std::fmt;

/// Status severity; each maps to an indicator colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Plain information.
    Info,
    /// Something is in progress (searching, disconnecting).
    Pending,
    /// Operation succeeded.
    Success,
    /// Degraded but running (failed sends).
    Warning,
    /// Operation failed or no session.
    Error,
}

impl Severity {
    /// Indicator colour name.
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Info => "black",
            Self::Pending => "orange",
            Self::Success => "green",
            Self::Warning => "orange",
            Self::Error => "red",
        }
    }

    /// ANSI SGR code for terminal rendering.
    pub const fn ansi(self) -> &'static str {
        match self {
            Self::Info => "0",
            Self::Pending | Self::Warning => "33",
            Self::Success => "32",
            Self::Error => "31",
        }
    }
}

/// One status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Text shown to the operator.
    pub text: String,
    /// Indicator severity.
    pub severity: Severity,
}

impl StatusUpdate {
    /// Build a status line.
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// What the connect control does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectAction {
    /// Open a session.
    #[default]
    Connect,
    /// Close the session.
    Disconnect,
}

/// Which operator controls are usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlsView {
    /// Connect/disconnect control enabled.
    pub connect_enabled: bool,
    /// What that control does.
    pub connect_action: ConnectAction,
    /// Start/stop control enabled.
    pub mode_enabled: bool,
    /// An engine is running (start/stop control reads "stop").
    pub mode_active: bool,
}

impl ControlsView {
    /// Availability implied by a session state.
    ///
    /// The connect control is disabled while a connect or disconnect is in
    /// flight, which also guards against double presses.
    pub const fn for_state(state: SessionState) -> Self {
        let busy = matches!(state, SessionState::Connecting | SessionState::Disconnecting);
        Self {
            connect_enabled: !busy,
            connect_action: if state.is_connected() {
                ConnectAction::Disconnect
            } else {
                ConnectAction::Connect
            },
            mode_enabled: state.is_connected(),
            mode_active: state.is_active(),
        }
    }
}

/// Telemetry for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telemetry {
    /// Command produced by the engine.
    pub command: CommandState,
    /// Ticks until the next reversal (periodic only).
    pub steps_until_reversal: Option<u32>,
    /// Why the packet did not reach the device, if it didn't.
    pub send_error: Option<TransportError>,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        if let Some(steps) = self.steps_until_reversal {
            write!(f, " (reversal in: {steps})")?;
        }
        if let Some(err) = &self.send_error {
            write!(f, " [{err}]")?;
        }
        Ok(())
    }
}

/// Display surface driven by the control scheduler.
pub trait Presenter: Send + Sync {
    /// Current operator-tuned periodic configuration.
    fn periodic_config(&self) -> PeriodicConfig;

    /// Replace the status line.
    fn show_status(&self, update: StatusUpdate);

    /// Update control availability.
    fn show_controls(&self, controls: ControlsView);

    /// Show the latest tick.
    fn show_telemetry(&self, telemetry: Telemetry);
}
