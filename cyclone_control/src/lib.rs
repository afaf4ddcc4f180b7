//! # Cyclone Control
//!
//! Command generation and transmission for the Cyclone rotary actuator.
//!
//! Two engines produce a `(speed, direction)` decision per tick:
//!
//! 1. **Periodic oscillator**: operator-tuned base speed and reversal period,
//!    each with a symmetric jitter band.
//! 2. **Autonomous randomizer**: speed tiers, a bounded random walk and
//!    frequent direction flips.
//!
//! The `ControlScheduler` owns the transport session and the engine, encodes
//! every decision into a 3-byte packet and sends it with a time bound. The
//! `CycleRunner` drives the scheduler from operator commands and the tick
//! timer on a single cooperative task; the `ConsolePanel` renders whatever the
//! scheduler pushes through the `Presenter` trait.

pub mod console;
pub mod cycle;
pub mod engine;
pub mod error;
pub mod presentation;
pub mod rng;
pub mod scheduler;
pub mod state;

pub use cycle::CycleRunner;
pub use error::ControlError;
pub use scheduler::{ControlScheduler, SchedulerTiming, TickReport, TickStats};
