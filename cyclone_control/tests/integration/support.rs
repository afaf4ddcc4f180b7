//! Shared fixtures: a scheduler wired to a simulated actuator and a panel.

use cyclone_common::types::{DeviceId, PeriodicConfig};
use cyclone_control::console::panel::ConsolePanel;
use cyclone_control::rng::RandomSource;
use cyclone_control::{ControlScheduler, SchedulerTiming};
use cyclone_link::{ActuatorProbe, SimulationDriver};
use std::sync::Arc;

pub struct Harness {
    pub scheduler: ControlScheduler,
    pub panel: Arc<ConsolePanel>,
    pub probe: ActuatorProbe,
}

impl Harness {
    pub fn new(config: PeriodicConfig, rng: impl RandomSource + 'static) -> Self {
        Self::with_timing(config, rng, SchedulerTiming::default())
    }

    pub fn with_timing(
        config: PeriodicConfig,
        rng: impl RandomSource + 'static,
        timing: SchedulerTiming,
    ) -> Self {
        let driver = SimulationDriver::new();
        let probe = driver.probe();
        let panel = Arc::new(ConsolePanel::new(config));
        let scheduler = ControlScheduler::new(Box::new(driver), panel.clone(), Box::new(rng), timing);
        Self {
            scheduler,
            panel,
            probe,
        }
    }

    pub fn targeting(mut self, device: DeviceId) -> Self {
        self.scheduler = self.scheduler.with_device(device);
        self
    }

    /// Status texts pushed so far, oldest first.
    pub fn status_texts(&self) -> Vec<String> {
        self.panel.history().into_iter().map(|s| s.text).collect()
    }
}

pub fn periodic(base_speed: u8, speed_jitter: u8, period: u32, period_jitter: u32) -> PeriodicConfig {
    PeriodicConfig {
        base_speed,
        speed_jitter,
        base_period_steps: period,
        period_jitter,
    }
}
