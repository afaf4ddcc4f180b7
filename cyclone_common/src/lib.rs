//! Cyclone Common Library
//!
//! Shared types, the actuator wire codec, the transport port and configuration
//! loading for all Cyclone workspace crates.
//!
//! # Module Structure
//!
//! - [`command`] - `Direction`, `CommandState`, `CommandPacket` codec
//! - [`types`] - `PeriodicConfig`, `DeviceId`
//! - [`state`] - `SessionState`, `ModeKind`
//! - [`transport`] - `Transport` trait and `TransportError`
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Wire format, ranges and default cadences
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use cyclone_common::prelude::*;
//!
//! let packet = CommandPacket::encode(CommandState::new(40, Direction::Reverse));
//! assert_eq!(packet.value(), 168);
//! ```

pub mod command;
pub mod config;
pub mod consts;
pub mod prelude;
pub mod state;
pub mod transport;
pub mod types;
