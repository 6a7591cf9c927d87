use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod calibration;
mod config;
mod logging;
mod runner;

use config::{AppConfig, Overrides};

/// Camera-driven poker table state and turn tracking.
#[derive(Debug, Parser)]
#[command(name = "pokertable", author, version, about = "Poker table state engine")]
struct Cli {
    /// Path to a JSON configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the shared state files.
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Override how long an unrefreshed card is kept.
    #[arg(long, value_name = "MS", global = true)]
    ttl_ms: Option<u64>,

    /// Override the cycle interval.
    #[arg(long, value_name = "MS", global = true)]
    interval_ms: Option<u64>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Aggregate detections, publish card files and track turns.
    Run {
        /// Calibrate player and board zones before starting.
        #[arg(short = 'z', long)]
        set_zones: bool,

        /// Stop after this many cycles.
        #[arg(long, value_name = "N")]
        cycles: Option<u64>,
    },
    /// Track turns over card files published by another process.
    Track {
        /// Stop after this many cycles.
        #[arg(long, value_name = "N")]
        cycles: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_json);

    let config = AppConfig::load(
        cli.config.as_deref(),
        Overrides {
            data_dir: cli.data_dir,
            ttl_ms: cli.ttl_ms,
            interval_ms: cli.interval_ms,
        },
    )?;

    match cli.command {
        Command::Run { set_zones, cycles } => runner::run(&config, set_zones, cycles),
        Command::Track { cycles } => runner::track(&config, cycles),
    }
}
