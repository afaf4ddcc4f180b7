//! Injectable randomness for the engines.
//!
//! Production uses `SystemRandom` (an entropy-seeded `StdRng`); tests script
//! the exact draws with `ScriptedRandom`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of the two draw kinds the engines need.
pub trait RandomSource: Send {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `low..=high` (`low <= high`).
    fn int_inclusive(&mut self, low: i32, high: i32) -> i32;
}

/// `StdRng`-backed source.
#[derive(Debug)]
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    /// Seed from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible stream (benchmarks, soak tests).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    fn int_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Replays queued draws in order.
///
/// # Panics
/// A draw from an empty queue, or a scripted integer outside the requested
/// range, panics: the test script does not match the code path.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    units: VecDeque<f64>,
    ints: VecDeque<i32>,
}

impl ScriptedRandom {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue unit draws.
    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    /// Queue integer draws.
    pub fn with_ints(mut self, ints: impl IntoIterator<Item = i32>) -> Self {
        self.ints.extend(ints);
        self
    }

    /// Draws not yet consumed (units, ints).
    pub fn remaining(&self) -> (usize, usize) {
        (self.units.len(), self.ints.len())
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        match self.units.pop_front() {
            Some(v) => v,
            None => panic!("scripted random: unit draw requested but none queued"),
        }
    }

    fn int_inclusive(&mut self, low: i32, high: i32) -> i32 {
        match self.ints.pop_front() {
            Some(v) if (low..=high).contains(&v) => v,
            Some(v) => panic!("scripted random: {v} outside {low}..={high}"),
            None => panic!("scripted random: int draw in {low}..={high} requested but none queued"),
        }
    }
}
