//! State machine module root.

pub mod session;
