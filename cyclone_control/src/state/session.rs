//! Session lifecycle transitions.
//!
//! `Disconnected → Connecting → ConnectedIdle ⇄ ConnectedActive →
//! Disconnecting → Disconnected`. Failed connects fall back to
//! `Disconnected`; disconnect is accepted from either connected state.

use cyclone_common::state::SessionState;

/// Result of a SessionState transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition succeeded, new state.
    Ok(SessionState),
    /// Transition rejected, reason.
    Rejected(&'static str),
}

/// Event that can move the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Operator asked to connect.
    Connect,
    /// Transport opened a session.
    ConnectSucceeded,
    /// Discovery or connection failed.
    ConnectFailed,
    /// Operator started an engine.
    StartMode,
    /// Operator stopped the engine.
    StopMode,
    /// Operator (or shutdown) asked to disconnect.
    Disconnect,
    /// Courtesy stop and transport disconnect finished.
    DisconnectComplete,
}

/// Holder of the current session state.
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    state: SessionState,
}

impl SessionStateMachine {
    /// Start in `Disconnected`.
    pub const fn new() -> Self {
        Self {
            state: SessionState::Disconnected,
        }
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Attempt a transition given an event.
    ///
    /// Rejected events leave the state untouched.
    pub fn handle_event(&mut self, event: SessionEvent) -> TransitionResult {
        use SessionEvent::*;
        use SessionState::*;

        let next = match (self.state, event) {
            (Disconnected, Connect) => Connecting,

            (Connecting, ConnectSucceeded) => ConnectedIdle,
            (Connecting, ConnectFailed) => Disconnected,

            (ConnectedIdle, StartMode) => ConnectedActive,
            (ConnectedActive, StopMode) => ConnectedIdle,

            (ConnectedIdle | ConnectedActive, Disconnect) => Disconnecting,
            (Disconnecting, DisconnectComplete) => Disconnected,

            _ => {
                return TransitionResult::Rejected(invalid_transition_reason(self.state, event));
            }
        };

        self.state = next;
        TransitionResult::Ok(next)
    }

    /// Whether engine ticks may run.
    #[inline]
    pub const fn allows_ticks(&self) -> bool {
        self.state.is_active()
    }
}

fn invalid_transition_reason(state: SessionState, event: SessionEvent) -> &'static str {
    use SessionEvent::*;
    use SessionState::*;
    match (state, event) {
        (Disconnected, StartMode | StopMode) => "Disconnected: connect first",
        (Disconnected, _) => "Disconnected: not connected",
        (Connecting, _) => "Connecting: connection attempt in progress",
        (ConnectedIdle, Connect) | (ConnectedActive, Connect) => "already connected",
        (ConnectedIdle, StopMode) => "ConnectedIdle: no mode running",
        (ConnectedActive, StartMode) => "ConnectedActive: a mode is already running",
        (ConnectedIdle, _) | (ConnectedActive, _) => "Connected: invalid event for current state",
        (Disconnecting, _) => "Disconnecting: disconnect in progress",
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
