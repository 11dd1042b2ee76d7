//! hpd-validate-labels - confusion counts of image occupancy predictions
//!
//! Expects hand-labelled images under `<labels>/<home>/<hub>/{Occupied,Vacant}/`
//! and classifier outputs under `<summaries>/<home>_Summaries/<hub>_{occupied,vacant}.csv`.
//!
//! Usage:
//!   hpd-validate-labels --labels /data/Labeled_Images
//!
//! Output:
//!   <out>/<home>/<home>_<hub>_labels.csv
//!   <out>/<home>_metrics.csv

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use hpd_tools::domain::HomeId;
use hpd_tools::infra::logging;
use hpd_tools::io::{csv_output, dataset, read_predictions};
use hpd_tools::services::label_validation::{validate_hub, HubValidation};

/// hpd-validate-labels - Compare image predictions with labelled images
#[derive(Parser, Debug)]
#[command(name = "hpd-validate-labels", version, about, long_about = None)]
struct Args {
    /// Folder with one H* subfolder per home of labelled images
    #[arg(short, long)]
    labels: PathBuf,

    /// Folder with <home>_Summaries prediction folders
    ///
    /// Defaults to <labels>/As_Labeled_Summaries.
    #[arg(short, long)]
    summaries: Option<PathBuf>,

    /// Output folder
    ///
    /// Defaults to <labels>/True_Summaries.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn validate_home(
    home_dir: &Path,
    summaries: &Path,
    out: &Path,
) -> anyhow::Result<Vec<HubValidation>> {
    let home = HomeId(dataset::base_name(home_dir));
    let summary_dir = summaries.join(format!("{home}_Summaries"));

    let mut results = Vec::new();
    for hub_dir in dataset::subdirs_with_prefix(home_dir, "RS")? {
        let hub = dataset::base_name(&hub_dir);

        let labelled_occupied = dataset::labelled_image_times(&hub_dir, "Occupied", &hub, &home)?;
        let labelled_vacant = dataset::labelled_image_times(&hub_dir, "Vacant", &hub, &home)?;
        let predicted_occupied =
            read_predictions(&summary_dir.join(format!("{hub}_occupied.csv")))?;
        let predicted_vacant =
            read_predictions(&summary_dir.join(format!("{hub}_vacant.csv")))?;

        let result = validate_hub(
            &hub,
            &labelled_occupied,
            &labelled_vacant,
            &predicted_occupied,
            &predicted_vacant,
        );

        let labels_path = out.join(home.as_str()).join(format!("{home}_{hub}_labels.csv"));
        csv_output::write_labels(&labels_path, &result.labels)?;

        info!(
            home = %home,
            hub = %hub,
            tp = result.summary.tp,
            fp = result.summary.fp,
            tn = result.summary.tn,
            fn_ = result.summary.fn_,
            accuracy = ?result.summary.accuracy(),
            "hub_validated"
        );
        results.push(result);
    }

    if results.is_empty() {
        warn!(home = %home, dir = %home_dir.display(), "no_hub_folders_found");
    } else {
        csv_output::write_metrics(&out.join(format!("{home}_metrics.csv")), &results)?;
    }

    Ok(results)
}

fn main() -> anyhow::Result<()> {
    logging::init();
    info!(version = %logging::version(), "hpd_validate_labels_starting");

    let args = Args::parse();
    let summaries = args.summaries.unwrap_or_else(|| args.labels.join("As_Labeled_Summaries"));
    let out = args.out.unwrap_or_else(|| args.labels.join("True_Summaries"));

    let homes = dataset::subdirs_with_prefix(&args.labels, "H")?;
    info!(labels = %args.labels.display(), homes = homes.len(), "label_validation_started");

    for home_dir in homes {
        validate_home(&home_dir, &summaries, &out)?;
    }

    info!(out = %out.display(), "hpd_validate_labels_done");
    Ok(())
}
