//! hpd-groundtruth - occupancy ground truth for one home
//!
//! Converts the per-occupant entry/exit logs of a home folder into a dense
//! 10 second household occupancy signal, buffers short vacancies and writes
//! one file per day of the published dataset.
//!
//! Module structure:
//! - `domain/` - Core types (events, presence, signals, input errors)
//! - `io/` - Dataset files (occupant logs, modality folders, CSV output)
//! - `services/` - Transforms (reconstruction, buffering, daily slicing, counts)
//! - `infra/` - Infrastructure (Config, logging)
//!
//! Usage:
//!   hpd-groundtruth --path /data/H1-red
//!   hpd-groundtruth --path /data/H1-red --save /out --dates start_end_dates.json

use clap::Parser;
use hpd_tools::infra::{logging, Config};
use hpd_tools::services::GroundTruthJob;
use std::path::PathBuf;
use tracing::info;

/// hpd-groundtruth - Occupancy ground truth from occupant entry/exit logs
#[derive(Parser, Debug)]
#[command(name = "hpd-groundtruth", version, about)]
struct Args {
    /// Home folder holding GroundTruth/<home>-<occupant>.csv logs
    #[arg(short, long)]
    path: PathBuf,

    /// Output root; files go to <save>/<home>-GROUNDTRUTH
    ///
    /// Defaults to Inference_DB/ inside the home folder.
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Path to TOML configuration file (falls back to CONFIG_FILE, then config/hpd.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON date schedule ({"H1": [["2019-11-26", "2019-12-25"]], ...})
    ///
    /// Replaces the [homes] table of the configuration.
    #[arg(short, long)]
    dates: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    info!(version = %logging::version(), "hpd_groundtruth_starting");

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dates) = &args.dates {
        config = config.with_schedule_file(dates)?;
    }

    let job = GroundTruthJob::new(&args.path, args.save.as_deref());
    info!(
        config_file = %config.config_file(),
        home = %job.home,
        home_dir = %job.home_dir.display(),
        daily_dir = %job.daily_dir.display(),
        sample_interval_secs = config.sample_interval_secs(),
        buffer_minutes = config.buffer_minutes(),
        "config_loaded"
    );

    let report = job.run(&config)?;

    info!(
        home = %report.home,
        occupants = report.occupants,
        samples = report.samples,
        occupied_samples = report.occupied_samples,
        days = report.days_written,
        empty_days = report.empty_days,
        "hpd_groundtruth_done"
    );

    Ok(())
}
