//! Autonomous randomizer: speed wanders between tiers with a small random walk
//! in between, and the direction flips on most ticks.

use crate::rng::RandomSource;
use cyclone_common::command::{CommandState, Direction};
use cyclone_common::consts::MAX_SPEED;

/// `change` below this re-rolls the speed tier.
pub const REROLL_THRESHOLD: f64 = 0.1;

/// `change` below this flips direction; at or above it the direction holds.
pub const FLIP_THRESHOLD: f64 = 0.9;

/// Random-walk step magnitude (±).
pub const WALK_STEP: i32 = 3;

/// Lowest speed the random walk settles on.
pub const WALK_FLOOR: u8 = 10;

/// Speed band picked on a tier re-roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTier {
    /// `0..=100`
    Any,
    /// Exactly 0.
    Halt,
    /// `40..=60`
    Cruise,
    /// `60..=85`
    Brisk,
    /// `85..=100`
    Sprint,
}

impl SpeedTier {
    /// Tier for a uniform draw in `[0, 1)`.
    pub fn from_draw(d: f64) -> Self {
        if d < 0.1 {
            Self::Any
        } else if d < 0.2 {
            Self::Halt
        } else if d < 0.5 {
            Self::Cruise
        } else if d < 0.8 {
            Self::Brisk
        } else {
            Self::Sprint
        }
    }

    /// Inclusive speed bounds.
    pub const fn bounds(self) -> (u8, u8) {
        match self {
            Self::Any => (0, MAX_SPEED),
            Self::Halt => (0, 0),
            Self::Cruise => (40, 60),
            Self::Brisk => (60, 85),
            Self::Sprint => (85, MAX_SPEED),
        }
    }

    /// Draw a speed from this tier. `Halt` takes no draw.
    pub fn roll(self, rng: &mut dyn RandomSource) -> u8 {
        match self {
            Self::Halt => 0,
            tier => {
                let (low, high) = tier.bounds();
                rng.int_inclusive(i32::from(low), i32::from(high)) as u8
            }
        }
    }
}

/// Randomizer state carried across ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomizerRuntime {
    speed: u8,
    direction: Direction,
}

impl RandomizerRuntime {
    /// Starts at `{0, Forward}`, so the first tick always re-rolls.
    pub const fn new() -> Self {
        Self {
            speed: 0,
            direction: Direction::Forward,
        }
    }

    /// Next command.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> CommandState {
        let change = rng.unit();

        if change < REROLL_THRESHOLD || self.speed == 0 {
            let tier = SpeedTier::from_draw(rng.unit());
            self.speed = tier.roll(rng);
        } else {
            let step = rng.int_inclusive(-WALK_STEP, WALK_STEP);
            self.speed = (i32::from(self.speed) + step)
                .clamp(i32::from(WALK_FLOOR), i32::from(MAX_SPEED)) as u8;
        }

        self.direction = if self.speed == 0 {
            Direction::Stopped
        } else if change < FLIP_THRESHOLD {
            self.direction.flipped()
        } else if self.direction == Direction::Stopped {
            Direction::Reverse
        } else {
            self.direction
        };

        CommandState::new(self.speed, self.direction)
    }

    /// Last emitted speed.
    #[inline]
    pub const fn speed(&self) -> u8 {
        self.speed
    }

    /// Last emitted direction.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for RandomizerRuntime {
    fn default() -> Self {
        Self::new()
    }
}
