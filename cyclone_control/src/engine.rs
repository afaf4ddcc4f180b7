//! Command engines.
//!
//! Each engine turns a runtime plus random draws into the next
//! `CommandState`. Engines are pure apart from their own runtime; transport
//! and presentation live in the scheduler.

pub mod oscillator;
pub mod randomizer;

use crate::rng::RandomSource;
use cyclone_common::command::CommandState;
use cyclone_common::state::ModeKind;
use cyclone_common::types::PeriodicConfig;

pub use oscillator::OscillatorRuntime;
pub use randomizer::{RandomizerRuntime, SpeedTier};

/// The runtime of whichever engine is running.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveEngine {
    /// Periodic oscillator.
    Periodic(OscillatorRuntime),
    /// Autonomous randomizer.
    Randomizer(RandomizerRuntime),
}

impl ActiveEngine {
    /// Fresh runtime for `kind`.
    pub fn start(kind: ModeKind, config: &PeriodicConfig, rng: &mut dyn RandomSource) -> Self {
        match kind {
            ModeKind::Periodic => Self::Periodic(OscillatorRuntime::start(config, rng)),
            ModeKind::Randomizer => Self::Randomizer(RandomizerRuntime::new()),
        }
    }

    /// Which engine this is.
    pub const fn kind(&self) -> ModeKind {
        match self {
            Self::Periodic(_) => ModeKind::Periodic,
            Self::Randomizer(_) => ModeKind::Randomizer,
        }
    }

    /// Advance one tick. `config` is ignored by the randomizer.
    pub fn tick(&mut self, config: &PeriodicConfig, rng: &mut dyn RandomSource) -> CommandState {
        match self {
            Self::Periodic(runtime) => runtime.tick(config, rng),
            Self::Randomizer(runtime) => runtime.tick(rng),
        }
    }

    /// Ticks left before the next reversal (periodic only).
    pub fn steps_until_reversal(&self) -> Option<u32> {
        match self {
            Self::Periodic(runtime) => Some(runtime.steps_until_reversal()),
            Self::Randomizer(_) => None,
        }
    }
}
