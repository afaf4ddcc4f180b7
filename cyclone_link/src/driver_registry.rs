//! Name → factory table for link drivers.
//!
//! The binary builds one registry at startup, opens the driver named in
//! `[link] driver` and hands the resulting `Box<dyn Transport>` to the
//! scheduler. Tests build their own registries; there is no global table.

use cyclone_common::config::LinkConfig;
use cyclone_common::transport::{Transport, TransportError, TransportFactory};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::drivers::register_all_drivers;

/// Known link drivers, keyed by name.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<&'static str, TransportFactory>,
}

impl DriverRegistry {
    /// Registry without any drivers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the drivers shipped in this crate.
    pub fn with_builtin_drivers() -> Self {
        let mut registry = Self::new();
        register_all_drivers(&mut registry);
        registry
    }

    /// Add `factory` under `name`.
    ///
    /// # Panics
    /// When `name` is taken; two drivers sharing a name is a build mistake.
    pub fn register(&mut self, name: &'static str, factory: TransportFactory) {
        if self.drivers.insert(name, factory).is_some() {
            panic!("link driver '{name}' registered twice");
        }
        debug!("Registered link driver '{name}'");
    }

    /// Whether `name` is known.
    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Build a fresh, uninitialized driver.
    ///
    /// # Errors
    /// `TransportError::DriverNotFound` for unknown names.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn Transport>, TransportError> {
        match self.drivers.get(name) {
            Some(factory) => Ok(factory()),
            None => Err(TransportError::DriverNotFound(format!(
                "{name} (available: {})",
                self.names().join(", ")
            ))),
        }
    }

    /// Build the driver named by `config.driver` and run its `init`.
    ///
    /// # Errors
    /// `DriverNotFound` for unknown names, or the driver's own `init` error.
    pub fn open(&self, config: &LinkConfig) -> Result<Box<dyn Transport>, TransportError> {
        let mut driver = self.instantiate(&config.driver)?;
        driver.init(config)?;
        info!("Link driver ready: {} v{}", driver.name(), driver.version());
        Ok(driver)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.drivers.keys().copied().collect()
    }
}
