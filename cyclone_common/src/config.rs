//! Configuration loading traits and types.
//!
//! Configuration is read once at startup from an optional TOML file. Every
//! field has a default, so running without a file is the normal case. Nothing
//! is ever written back.
//!
//! # Usage
//!
//! ```rust,no_run
//! use cyclone_common::config::{AppConfig, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = AppConfig::load_or_default(Some(Path::new("cyclone.toml")))?;
//!     println!("Driver: {}", config.link.driver);
//!     Ok(())
//! }
//! ```

use crate::consts::{
    DEFAULT_DRIVER, DEFAULT_SERVICE_NAME, DISCOVERY_TIMEOUT_MS, PANEL_REFRESH_MS,
    PERIODIC_TICK_MS, RANDOMIZER_TICK_MS, SEND_TIMEOUT_MS,
};
use crate::types::PeriodicConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

/// Common configuration fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "cyclone-bench-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

fn default_discovery_timeout_ms() -> u64 {
    DISCOVERY_TIMEOUT_MS
}

fn default_send_timeout_ms() -> u64 {
    SEND_TIMEOUT_MS
}

/// Transport link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Transport driver to load (e.g. "simulation").
    #[serde(default = "default_driver")]
    pub driver: String,

    /// How long discovery may search for the device.
    #[serde(default = "default_discovery_timeout_ms")]
    pub discovery_timeout_ms: u64,

    /// Upper bound on a single command write.
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,

    /// Per-driver configuration sections.
    /// Key = driver name, Value = driver-specific TOML table.
    #[serde(default)]
    pub driver_config: HashMap<String, toml::Value>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            discovery_timeout_ms: DISCOVERY_TIMEOUT_MS,
            send_timeout_ms: SEND_TIMEOUT_MS,
            driver_config: HashMap::new(),
        }
    }
}

impl LinkConfig {
    /// Discovery timeout as `Duration`.
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    /// Send timeout as `Duration`.
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Driver-specific table for `driver`, if present.
    pub fn driver_section(&self, driver: &str) -> Option<&toml::Value> {
        self.driver_config.get(driver)
    }
}

fn default_periodic_tick_ms() -> u64 {
    PERIODIC_TICK_MS
}

/// `[periodic]` section: cadence plus the initial oscillator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicSection {
    /// Tick interval of the periodic engine.
    #[serde(default = "default_periodic_tick_ms")]
    pub tick_interval_ms: u64,

    /// Initial operator settings.
    #[serde(flatten)]
    pub initial: PeriodicConfig,
}

impl Default for PeriodicSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: PERIODIC_TICK_MS,
            initial: PeriodicConfig::default(),
        }
    }
}

fn default_randomizer_tick_ms() -> u64 {
    RANDOMIZER_TICK_MS
}

/// `[randomizer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomizerSection {
    /// Tick interval of the randomizer engine.
    #[serde(default = "default_randomizer_tick_ms")]
    pub tick_interval_ms: u64,
}

impl Default for RandomizerSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: RANDOMIZER_TICK_MS,
        }
    }
}

fn default_refresh_ms() -> u64 {
    PANEL_REFRESH_MS
}

/// `[console]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSection {
    /// How often the console panel redraws.
    #[serde(default = "default_refresh_ms")]
    pub refresh_interval_ms: u64,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            refresh_interval_ms: PANEL_REFRESH_MS,
        }
    }
}

/// Complete application configuration.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "info"
///
/// [link]
/// driver = "simulation"
/// send_timeout_ms = 1000
///
/// [periodic]
/// tick_interval_ms = 100
/// base_speed = 40
///
/// [randomizer]
/// tick_interval_ms = 500
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared fields.
    #[serde(default)]
    pub shared: SharedConfig,
    /// Transport link.
    #[serde(default)]
    pub link: LinkConfig,
    /// Periodic oscillator.
    #[serde(default)]
    pub periodic: PeriodicSection,
    /// Autonomous randomizer.
    #[serde(default)]
    pub randomizer: RandomizerSection,
    /// Console front end.
    #[serde(default)]
    pub console: ConsoleSection,
}

impl AppConfig {
    /// Load from `path` when given, otherwise return defaults. Always validated.
    ///
    /// # Errors
    /// Propagates `ConfigLoader::load` errors and validation failures.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => <Self as ConfigLoader>::load(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `shared.service_name` not empty
    /// 2. `link.driver` not empty
    /// 3. All intervals and timeouts > 0
    /// 4. Initial periodic settings within range
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.link.driver.is_empty() {
            return Err(ConfigError::ValidationError(
                "link.driver cannot be empty".to_string(),
            ));
        }

        let intervals = [
            ("link.discovery_timeout_ms", self.link.discovery_timeout_ms),
            ("link.send_timeout_ms", self.link.send_timeout_ms),
            ("periodic.tick_interval_ms", self.periodic.tick_interval_ms),
            ("randomizer.tick_interval_ms", self.randomizer.tick_interval_ms),
            ("console.refresh_interval_ms", self.console.refresh_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be greater than 0"
                )));
            }
        }

        self.periodic.initial.validate()
    }

    /// Periodic engine tick interval.
    pub fn periodic_tick(&self) -> Duration {
        Duration::from_millis(self.periodic.tick_interval_ms)
    }

    /// Randomizer engine tick interval.
    pub fn randomizer_tick(&self) -> Duration {
        Duration::from_millis(self.randomizer.tick_interval_ms)
    }

    /// Console refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.console.refresh_interval_ms)
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
