//! Prelude module for common re-exports.
//!
//! ```rust
//! use cyclone_common::prelude::*;
//! ```

// ─── Wire codec ─────────────────────────────────────────────────────
pub use crate::command::{CommandPacket, CommandState, Direction, PacketError, encode};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{AppConfig, ConfigError, ConfigLoader, LinkConfig, LogLevel};
pub use crate::types::{DeviceId, PeriodicConfig, PeriodicField};

// ─── Session ────────────────────────────────────────────────────────
pub use crate::state::{ModeKind, SessionState};

// ─── Transport port ─────────────────────────────────────────────────
pub use crate::transport::{Transport, TransportDiagnostics, TransportError, TransportFactory};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{MAX_SPEED, STOP_CODE};
