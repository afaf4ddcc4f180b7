//! Operator-tunable motion parameters and device identity.
//!
//! - `PeriodicConfig` - Base values and jitter bands of the periodic oscillator
//! - `PeriodicField` - One adjustable field, used by live edits
//! - `DeviceId` - Address + write characteristic of the actuator

use crate::config::ConfigError;
use crate::consts::{
    DEFAULT_BASE_PERIOD_STEPS, DEVICE_ADDRESS, MAX_PERIOD_JITTER, MAX_PERIOD_STEPS, MAX_SPEED,
    MAX_SPEED_JITTER, MIN_PERIOD_STEPS, WRITE_CHARACTERISTIC_UUID,
};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_base_period_steps() -> u32 {
    DEFAULT_BASE_PERIOD_STEPS
}

/// Periodic oscillator configuration.
///
/// Owned by the presentation side and read by the engine on every tick.
///
/// # TOML Example
///
/// ```toml
/// [periodic]
/// base_speed = 50
/// speed_jitter = 5
/// base_period_steps = 10
/// period_jitter = 2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicConfig {
    /// Base speed, `0..=100`.
    #[serde(default)]
    pub base_speed: u8,

    /// Speed jitter magnitude (±), `0..=50`.
    #[serde(default)]
    pub speed_jitter: u8,

    /// Ticks between reversals, `1..=200`.
    #[serde(default = "default_base_period_steps")]
    pub base_period_steps: u32,

    /// Reversal period jitter magnitude (± ticks), `0..=100`.
    #[serde(default)]
    pub period_jitter: u32,
}

impl Default for PeriodicConfig {
    fn default() -> Self {
        Self {
            base_speed: 0,
            speed_jitter: 0,
            base_period_steps: DEFAULT_BASE_PERIOD_STEPS,
            period_jitter: 0,
        }
    }
}

impl PeriodicConfig {
    /// Copy with every field forced into its permitted range.
    pub fn clamped(self) -> Self {
        Self {
            base_speed: self.base_speed.min(MAX_SPEED),
            speed_jitter: self.speed_jitter.min(MAX_SPEED_JITTER),
            base_period_steps: self
                .base_period_steps
                .clamp(MIN_PERIOD_STEPS, MAX_PERIOD_STEPS),
            period_jitter: self.period_jitter.min(MAX_PERIOD_JITTER),
        }
    }

    /// Validate ranges.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_speed > MAX_SPEED {
            return Err(ConfigError::ValidationError(format!(
                "periodic.base_speed {} exceeds {}",
                self.base_speed, MAX_SPEED
            )));
        }
        if self.speed_jitter > MAX_SPEED_JITTER {
            return Err(ConfigError::ValidationError(format!(
                "periodic.speed_jitter {} exceeds {}",
                self.speed_jitter, MAX_SPEED_JITTER
            )));
        }
        if !(MIN_PERIOD_STEPS..=MAX_PERIOD_STEPS).contains(&self.base_period_steps) {
            return Err(ConfigError::ValidationError(format!(
                "periodic.base_period_steps {} outside {}..={}",
                self.base_period_steps, MIN_PERIOD_STEPS, MAX_PERIOD_STEPS
            )));
        }
        if self.period_jitter > MAX_PERIOD_JITTER {
            return Err(ConfigError::ValidationError(format!(
                "periodic.period_jitter {} exceeds {}",
                self.period_jitter, MAX_PERIOD_JITTER
            )));
        }
        Ok(())
    }

    /// Apply a live edit, clamping the value into range.
    pub fn apply(&mut self, field: PeriodicField, value: u32) {
        let value_u8 = value.min(u8::MAX as u32) as u8;
        match field {
            PeriodicField::BaseSpeed => self.base_speed = value_u8,
            PeriodicField::SpeedJitter => self.speed_jitter = value_u8,
            PeriodicField::BasePeriodSteps => self.base_period_steps = value,
            PeriodicField::PeriodJitter => self.period_jitter = value,
        }
        *self = self.clamped();
    }
}

/// An adjustable `PeriodicConfig` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodicField {
    /// `base_speed`
    BaseSpeed,
    /// `speed_jitter`
    SpeedJitter,
    /// `base_period_steps`
    BasePeriodSteps,
    /// `period_jitter`
    PeriodJitter,
}

impl fmt::Display for PeriodicField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BaseSpeed => "base speed",
            Self::SpeedJitter => "speed jitter",
            Self::BasePeriodSteps => "reversal period",
            Self::PeriodJitter => "period jitter",
        })
    }
}

/// Identity of the actuator on the radio link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId {
    /// Radio address.
    pub address: String,
    /// Characteristic receiving command packets.
    pub write_characteristic: String,
}

impl DeviceId {
    /// Identity with a custom address and the standard write characteristic.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            write_characteristic: WRITE_CHARACTERISTIC_UUID.to_string(),
        }
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::with_address(DEVICE_ADDRESS)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}
