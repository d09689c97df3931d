//! Smart Route Admin: terminal dashboard for traffic congestion and live vehicle counts.

mod app;
mod config;
mod constants;
mod error;
mod feed;
mod traffic;
mod ui;
mod util;

use std::{
    fs::File,
    path::PathBuf,
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use clap::Parser;
use env_logger::{Env, Target};

use crate::config::DashboardConfig;
use crate::constants::{CLOCK_REFRESH_SECS, LIVE_REFRESH_SECS, TICK_RATE_MS};
use crate::error::{DashboardError, Result};

#[derive(Parser, Debug)]
#[command(name = "smart-route-admin")]
#[command(about = "Traffic management dashboard in the terminal")]
#[command(version)]
struct Cli {
    /// Seconds between clock and congestion status refreshes
    #[arg(long, default_value_t = CLOCK_REFRESH_SECS)]
    clock_interval_secs: u64,

    /// Seconds between live chart rotations
    #[arg(long, default_value_t = LIVE_REFRESH_SECS)]
    live_interval_secs: u64,

    /// UI redraw and input poll interval in milliseconds
    #[arg(long, default_value_t = TICK_RATE_MS)]
    tick_ms: u64,

    /// Seed for the synthetic vehicle feed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (RUST_LOG sets the level, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn to_config(&self) -> DashboardConfig {
        DashboardConfig {
            clock_interval: Duration::from_secs(self.clock_interval_secs),
            live_interval: Duration::from_secs(self.live_interval_secs),
            tick_rate: Duration::from_millis(self.tick_ms),
            seed: self.seed,
        }
    }
}

// The TUI owns the terminal, so logs only go to a file
fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| DashboardError::Logger(e.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_file.as_ref())?;

    let config = cli.to_config();
    config.validate()?;
    log::info!("starting dashboard with {config:?}");

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })?;

    ui::run(config, shutdown)?;
    log::info!("dashboard closed");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
