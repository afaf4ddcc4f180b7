//! Simulation driver module.
//!
//! A software actuator that decodes every command packet it receives, so the
//! controller can be developed and tested without the physical device.

mod actuator;
mod driver;
mod options;

pub use actuator::{ActuatorProbe, ActuatorState};
pub use driver::SimulationDriver;
pub use options::SimulationOptions;

use cyclone_common::transport::Transport;

/// Factory function to create a simulation driver instance.
pub fn create_driver() -> Box<dyn Transport> {
    Box::new(SimulationDriver::new())
}
