//! Periodic oscillator: constant speed (plus jitter) with a direction flip
//! every `target_steps` ticks.

use crate::rng::RandomSource;
use cyclone_common::command::{CommandState, Direction};
use cyclone_common::consts::{MAX_SPEED, MIN_PERIOD_STEPS};
use cyclone_common::types::PeriodicConfig;

/// Oscillator state carried across ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OscillatorRuntime {
    step_count: u32,
    target_steps: u32,
    direction: Direction,
}

impl OscillatorRuntime {
    /// Fresh runtime, rotating forward with a newly drawn reversal period.
    pub fn start(config: &PeriodicConfig, rng: &mut dyn RandomSource) -> Self {
        Self {
            step_count: 0,
            target_steps: draw_target_steps(config, rng),
            direction: Direction::Forward,
        }
    }

    /// Next command. The reversal tick itself already emits the new direction.
    pub fn tick(&mut self, config: &PeriodicConfig, rng: &mut dyn RandomSource) -> CommandState {
        let jitter = if config.speed_jitter > 0 {
            let magnitude = i32::from(config.speed_jitter);
            rng.int_inclusive(-magnitude, magnitude)
        } else {
            0
        };
        let speed = (i32::from(config.base_speed) + jitter).clamp(0, i32::from(MAX_SPEED)) as u8;

        self.step_count += 1;
        if self.step_count >= self.target_steps {
            self.direction = self.direction.flipped();
            self.target_steps = draw_target_steps(config, rng);
            self.step_count = 0;
        }

        CommandState::new(speed, self.direction)
    }

    /// Ticks completed since the last reversal.
    #[inline]
    pub const fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Ticks between the last reversal and the next one.
    #[inline]
    pub const fn target_steps(&self) -> u32 {
        self.target_steps
    }

    /// Current rotation.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Ticks left until the next flip.
    #[inline]
    pub const fn steps_until_reversal(&self) -> u32 {
        self.target_steps.saturating_sub(self.step_count)
    }
}

/// `max(1, base_period_steps ± period_jitter)`.
///
/// No draw is taken when `period_jitter` is zero.
pub fn draw_target_steps(config: &PeriodicConfig, rng: &mut dyn RandomSource) -> u32 {
    let base = i64::from(config.base_period_steps);
    let jitter = if config.period_jitter > 0 {
        let magnitude = config.period_jitter.min(i32::MAX as u32) as i32;
        i64::from(rng.int_inclusive(-magnitude, magnitude))
    } else {
        0
    };
    (base + jitter).max(i64::from(MIN_PERIOD_STEPS)) as u32
}
