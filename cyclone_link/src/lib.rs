//! # Cyclone Link Library
//!
//! Transport layer with a pluggable driver architecture.
//!
//! Drivers implement the `Transport` trait defined in
//! `cyclone_common::transport`. The control scheduler obtains exactly one
//! driver from the [`DriverRegistry`] at startup and owns it for the rest of
//! the process.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - Driver implementations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    cyclone_link                             │
//! │  ┌──────────────────┐        ┌───────────────────────────┐  │
//! │  │  DriverRegistry  │──────► │ Box<dyn Transport>        │  │
//! │  │  (name → factory)│        │  connect / send /         │  │
//! │  └──────────────────┘        │  disconnect / is_connected│  │
//! │                              └─────────────┬─────────────┘  │
//! │                                            ▼                │
//! │                              ┌───────────────────────────┐  │
//! │                              │ SimulationDriver          │  │
//! │                              │  (simulated actuator)     │  │
//! │                              └───────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![deny(warnings)]
#![deny(missing_docs)]

pub mod driver_registry;
pub mod drivers;

// Re-export key types for convenience
pub use crate::driver_registry::DriverRegistry;
pub use crate::drivers::simulation::{ActuatorProbe, SimulationDriver};
