//! Cooperative control cycle.
//!
//! A single task owns the `ControlScheduler` and multiplexes two sources:
//! operator commands from the mpsc channel and the tick timer of the running
//! mode. The select is biased towards commands, so a stop or disconnect that
//! is already queued always wins over a pending tick.
//!
//! ## Tick timer
//! Created when a mode starts (first tick one interval later), dropped when it
//! stops. Missed ticks are delayed rather than bursted, which keeps the wire
//! cadence steady after a slow send.

use crate::console::input::{HELP, OperatorCommand};
use crate::console::panel::ConsolePanel;
use crate::error::ControlError;
use crate::presentation::{Presenter, Severity, StatusUpdate};
use crate::scheduler::ControlScheduler;
use cyclone_common::state::ModeKind;
use cyclone_common::types::PeriodicField;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

/// Command loop around one scheduler.
pub struct CycleRunner {
    scheduler: ControlScheduler,
    panel: Arc<ConsolePanel>,
    mode: ModeKind,
    commands: mpsc::Receiver<OperatorCommand>,
}

impl CycleRunner {
    /// Runner driving `mode` (the variant chosen on the command line).
    pub fn new(
        scheduler: ControlScheduler,
        panel: Arc<ConsolePanel>,
        mode: ModeKind,
        commands: mpsc::Receiver<OperatorCommand>,
    ) -> Self {
        Self {
            scheduler,
            panel,
            mode,
            commands,
        }
    }

    /// Run until `Quit` or until every command sender is gone, then stop and
    /// disconnect. Returns the scheduler for inspection.
    pub async fn run(mut self) -> ControlScheduler {
        info!("Cycle runner started ({} mode)", self.mode);
        let mut ticker: Option<Interval> = None;
        let mut ticking: Option<ModeKind> = None;

        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => {
                    let Some(command) = command else {
                        debug!("Command channel closed");
                        break;
                    };
                    if self.handle(command).await.is_break() {
                        break;
                    }
                }

                () = next_tick(&mut ticker) => {
                    self.scheduler.tick().await;
                }
            }

            let running = self.scheduler.active_mode();
            if running != ticking {
                ticker = running.map(|kind| tick_timer(self.scheduler.tick_interval(kind)));
                ticking = running;
            }
        }

        self.scheduler.shutdown().await;
        info!("Cycle runner stopped");
        self.scheduler
    }

    async fn handle(&mut self, command: OperatorCommand) -> ControlFlow<()> {
        debug!("Operator command: {command:?}");
        let result = match command {
            OperatorCommand::Connect => self.scheduler.connect().await,
            OperatorCommand::Disconnect => self.scheduler.disconnect().await,
            OperatorCommand::Toggle => self.scheduler.toggle_mode(self.mode).await,
            OperatorCommand::Start => self.scheduler.start_mode(self.mode),
            OperatorCommand::Stop => self.scheduler.stop_mode().await,
            OperatorCommand::Set(field, value) => {
                self.adjust(field, value);
                Ok(())
            }
            OperatorCommand::Status => {
                self.show_summary();
                Ok(())
            }
            OperatorCommand::Help => {
                self.panel.show_status(StatusUpdate::new(HELP, Severity::Info));
                Ok(())
            }
            OperatorCommand::Quit => {
                info!("Quit requested");
                return ControlFlow::Break(());
            }
        };
        self.report(result);
        ControlFlow::Continue(())
    }

    fn adjust(&self, field: PeriodicField, value: u32) {
        if self.mode != ModeKind::Periodic {
            self.panel.show_status(StatusUpdate::new(
                format!("{field} is not adjustable in {} mode", self.mode),
                Severity::Warning,
            ));
            return;
        }
        let config = self.panel.set_field(field, value);
        info!(
            "Settings: speed {} ±{}, reversal every {} ±{} ticks",
            config.base_speed, config.speed_jitter, config.base_period_steps, config.period_jitter
        );
        self.panel.show_status(StatusUpdate::new(
            format!(
                "speed {} ±{}, reversal every {} ±{} ticks",
                config.base_speed,
                config.speed_jitter,
                config.base_period_steps,
                config.period_jitter
            ),
            Severity::Info,
        ));
    }

    fn show_summary(&self) {
        let stats = self.scheduler.stats();
        let mut text = format!(
            "{} | {} | {} ticks, {} failed sends",
            self.scheduler.device().address,
            self.scheduler.state(),
            stats.ticks,
            stats.failed_sends
        );
        if self.mode == ModeKind::Periodic {
            let config = self.panel.periodic_config();
            text.push_str(&format!(
                " | speed {} ±{}, period {} ±{}",
                config.base_speed, config.speed_jitter, config.base_period_steps, config.period_jitter
            ));
        }
        self.panel.show_status(StatusUpdate::new(text, Severity::Info));
    }

    fn report(&self, result: Result<(), ControlError>) {
        match result {
            Ok(()) => {}
            Err(e) if e.is_rejection() => {
                warn!("{e}");
                self.panel
                    .show_status(StatusUpdate::new(e.to_string(), Severity::Warning));
            }
            // Transport failures already reached the panel through the scheduler.
            Err(e) => debug!("Command failed: {e}"),
        }
    }
}

fn tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
