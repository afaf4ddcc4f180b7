//! Control-layer errors.
//!
//! Transport failures are wrapped transparently; operator
//! commands that do not fit the current session state are rejected with
//! `InvalidTransition` and leave the state untouched.

use cyclone_common::transport::TransportError;
use thiserror::Error;

/// Errors surfaced by the control scheduler and the runner.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Operator command not valid in the current session state.
    #[error("{action} rejected: {reason}")]
    InvalidTransition {
        /// Requested action (e.g. "start").
        action: &'static str,
        /// Why the session refused it.
        reason: &'static str,
    },

    /// Link failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ControlError {
    /// True when the error is a rejected operator command.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}
