//! # Cyclone
//!
//! Console controller for the Cyclone rotary actuator.
//!
//! Two variants share one binary:
//! - **periodic**: operator-tuned oscillation; connect, start/stop and the
//!   settings are typed on the console.
//! - **random**: autonomous randomizer; connects at startup, a blank line
//!   starts and stops it.
//!
//! Everything runs on a current-thread tokio runtime: the control cycle, the
//! console reader, the panel refresh and the Ctrl+C listener. On exit the
//! actuator is stopped and the session closed before the process ends.

use clap::{Parser, Subcommand};
use cyclone_common::config::{AppConfig, LogLevel};
use cyclone_common::state::ModeKind;
use cyclone_control::console::input::{HELP, OperatorCommand};
use cyclone_control::console::panel::ConsolePanel;
use cyclone_control::console::{forward_interrupt, read_operator_input, refresh_panel};
use cyclone_control::presentation::{Presenter, Severity, StatusUpdate};
use cyclone_control::rng::SystemRandom;
use cyclone_control::{ControlScheduler, CycleRunner, SchedulerTiming};
use cyclone_link::DriverRegistry;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Grace period for blocked console reads once the cycle has finished.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// Cyclone actuator controller
#[derive(Parser, Debug)]
#[command(name = "cyclone")]
#[command(version)]
#[command(about = "Drive the Cyclone rotary actuator over its command link")]
struct Args {
    /// Optional TOML file with startup defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Transport driver (overrides `link.driver`).
    #[arg(long, value_name = "NAME")]
    driver: Option<String>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    variant: Variant,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    /// Operator-tuned periodic oscillation.
    Periodic,
    /// Autonomous randomized motion.
    Random,
}

impl Variant {
    const fn mode(self) -> ModeKind {
        match self {
            Self::Periodic => ModeKind::Periodic,
            Self::Random => ModeKind::Randomizer,
        }
    }
}

fn main() {
    let args = Args::parse();
    let config = AppConfig::load_or_default(args.config.as_deref());
    let level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("Cyclone v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Cyclone shutdown complete");
}

fn run(args: &Args, mut config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(driver) = &args.driver {
        config.link.driver = driver.clone();
    }
    let mode = args.variant.mode();

    let registry = DriverRegistry::with_builtin_drivers();
    let transport = registry.open(&config.link)?;
    info!(
        "Config OK: mode={mode}, driver={}, tick={:?}, send_timeout={:?}",
        config.link.driver,
        SchedulerTiming::from_config(&config).tick_interval(mode),
        config.link.send_timeout()
    );

    let panel = Arc::new(ConsolePanel::new(config.periodic.initial));
    let scheduler = ControlScheduler::new(
        transport,
        panel.clone(),
        Box::new(SystemRandom::new()),
        SchedulerTiming::from_config(&config),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let refresh = config.refresh_interval();
    let result = runtime.block_on(async move {
        let (tx, rx) = mpsc::channel(32);

        let colour = std::io::stdout().is_terminal();
        let refresher = tokio::spawn(refresh_panel(
            panel.clone(),
            refresh,
            std::io::stdout(),
            colour,
        ));
        tokio::spawn(forward_interrupt(tx.clone()));
        tokio::spawn(read_operator_input(
            BufReader::new(tokio::io::stdin()),
            tx.clone(),
            panel.clone(),
        ));

        panel.show_status(StatusUpdate::new(HELP, Severity::Info));
        if mode == ModeKind::Randomizer {
            tx.send(OperatorCommand::Connect).await?;
        }
        drop(tx);

        let scheduler = CycleRunner::new(scheduler, panel.clone(), mode, rx)
            .run()
            .await;

        // final frame
        tokio::time::sleep(refresh).await;
        refresher.abort();
        println!();

        if let Some(diag) = scheduler.transport_diagnostics() {
            info!(
                "Link: {} connect(s), {} packet(s) delivered, {} failure(s){}",
                diag.connects,
                diag.packets_sent,
                diag.send_failures,
                diag.custom.map(|c| format!(", {c}")).unwrap_or_default()
            );
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    });

    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    result
}

fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // stdout belongs to the console panel
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
