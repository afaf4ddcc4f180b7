//! Link session and mode enums shared by the scheduler and its observers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the single transport session.
///
/// `Disconnected → Connecting → ConnectedIdle ⇄ ConnectedActive →
/// Disconnecting → Disconnected`. Ticks only run in `ConnectedActive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum SessionState {
    /// No session.
    #[default]
    Disconnected = 0,
    /// Discovery / connection in progress.
    Connecting = 1,
    /// Connected, no engine running.
    ConnectedIdle = 2,
    /// Connected, an engine is ticking.
    ConnectedActive = 3,
    /// Courtesy stop + disconnect in progress.
    Disconnecting = 4,
}

impl SessionState {
    /// True in either connected state.
    #[inline]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::ConnectedIdle | Self::ConnectedActive)
    }

    /// True while an engine is running.
    #[inline]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::ConnectedActive)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::ConnectedIdle => "connected (idle)",
            Self::ConnectedActive => "connected (running)",
            Self::Disconnecting => "disconnecting",
        })
    }
}

/// Which engine drives the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    /// Operator-tuned periodic oscillator.
    Periodic,
    /// Autonomous randomizer.
    Randomizer,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Periodic => "periodic",
            Self::Randomizer => "randomizer",
        })
    }
}
