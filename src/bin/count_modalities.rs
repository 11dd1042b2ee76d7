//! hpd-count-modalities - per-day data completeness of one home
//!
//! For every configured hub counts how much audio, image and environmental
//! data exists per day relative to the expected sample count, optionally adds
//! dark image percentages and the occupied share of the daily ground truth.
//!
//! Usage:
//!   hpd-count-modalities --root /data/H2 --home H2
//!   hpd-count-modalities --root /data/H2 --home H2 --groundtruth /out/H2-GROUNDTRUTH
//!
//! Output:
//!   <out>/<home>_counts.csv

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use hpd_tools::domain::HomeId;
use hpd_tools::infra::{logging, Config};
use hpd_tools::io::csv_output;
use hpd_tools::services::ModalityCounter;

/// hpd-count-modalities - Per-day completeness of each sensing modality
#[derive(Parser, Debug)]
#[command(name = "hpd-count-modalities", version, about, long_about = None)]
struct Args {
    /// Folder holding <home>-<hub>-audio, -images and -env folders
    #[arg(short, long)]
    root: PathBuf,

    /// Home identifier (e.g. H2)
    #[arg(long)]
    home: String,

    /// Folder with <date>_<home>_groundtruth.csv files for the Occupancy column
    #[arg(short, long)]
    groundtruth: Option<PathBuf>,

    /// Output folder
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Path to TOML configuration file (falls back to CONFIG_FILE, then config/hpd.toml)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    info!(version = %logging::version(), "hpd_count_modalities_starting");

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let home = HomeId(args.home);
    let days = config.schedule().days(&home)?;

    info!(
        config_file = %config.config_file(),
        home = %home,
        days = days.len(),
        hubs = ?config.hubs(),
        root = %args.root.display(),
        "count_config_loaded"
    );

    let counter = ModalityCounter::new(&config, &args.root, home.clone(), &days);
    let table = counter.run(args.groundtruth.as_deref())?;

    let path = args.out.join(format!("{home}_counts.csv"));
    csv_output::write_count_table(&path, &table)?;

    info!(
        home = %home,
        columns = table.column_names().len(),
        days = table.days().len(),
        file = %path.display(),
        "counts_written"
    );

    Ok(())
}
