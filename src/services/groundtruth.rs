//! Ground truth job for one home folder
//!
//! Reads every occupant log under `<home>/GroundTruth`, reconstructs the
//! household signal, buffers it and writes:
//! - `<full_dir>/<home>_occupancy_buffer.csv` - buffered household timeline
//! - `<full_dir>/<home>_occupancy_raw.csv` - per-occupant unbuffered timeline
//! - `<daily_dir>/<date>_<home>_groundtruth.csv` - one file per scheduled day

use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::types::{HomeId, OccupantLog};
use crate::infra::Config;
use crate::io::{csv_output, dataset, occupant_log};
use crate::services::{buffer, daily, reconstructor};

/// Where a job reads from and writes to
#[derive(Debug, Clone)]
pub struct GroundTruthJob {
    pub home_dir: PathBuf,
    pub home: HomeId,
    pub daily_dir: PathBuf,
    pub full_dir: PathBuf,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTruthReport {
    pub home: HomeId,
    pub occupants: usize,
    pub samples: usize,
    pub occupied_samples: usize,
    pub days_written: usize,
    pub empty_days: usize,
}

impl GroundTruthJob {
    /// Output layout: `<save>/<home>-GROUNDTRUTH` for everything when `save` is
    /// given, otherwise `Inference_DB/GroundTruth` and `Inference_DB/Full_inferences`
    /// inside the home folder.
    pub fn new(home_dir: impl Into<PathBuf>, save: Option<&Path>) -> Self {
        let home_dir = home_dir.into();
        let home = HomeId::from_folder_name(&home_dir.to_string_lossy());
        let (daily_dir, full_dir) = match save {
            Some(save) => {
                let root = save.join(format!("{home}-GROUNDTRUTH"));
                (root.clone(), root)
            }
            None => {
                let db = home_dir.join("Inference_DB");
                (db.join("GroundTruth"), db.join("Full_inferences"))
            }
        };
        Self { home_dir, home, daily_dir, full_dir }
    }

    /// Read every occupant log of the home
    pub fn read_logs(&self) -> anyhow::Result<Vec<OccupantLog>> {
        dataset::occupant_log_paths(&self.home_dir)?
            .iter()
            .map(|p| occupant_log::read_occupant_log(p))
            .collect()
    }

    pub fn buffered_path(&self) -> PathBuf {
        self.full_dir.join(format!("{}_occupancy_buffer.csv", self.home))
    }

    pub fn raw_path(&self) -> PathBuf {
        self.full_dir.join(format!("{}_occupancy_raw.csv", self.home))
    }

    pub fn daily_path(&self, date: chrono::NaiveDate) -> PathBuf {
        self.daily_dir.join(format!("{}_{}_groundtruth.csv", date.format("%Y-%m-%d"), self.home))
    }

    /// Run the whole job
    pub fn run(&self, config: &Config) -> anyhow::Result<GroundTruthReport> {
        let logs = self.read_logs()?;
        if let Some((first, last)) = reconstructor::event_span(&logs) {
            info!(
                home = %self.home,
                occupants = logs.len(),
                first = %first,
                last = %last,
                "occupant_logs_loaded"
            );
        }

        // Unscheduled homes fail before anything is written
        let days = config.schedule().days(&self.home)?;

        let household = reconstructor::reconstruct_household(&logs, config.sample_interval_secs())?;
        let buffered = buffer::apply_buffer(&household, config.buffer_minutes());

        csv_output::write_raw_timeline(&self.raw_path(), &household)?;
        csv_output::write_buffered_timeline(&self.buffered_path(), &buffered)?;
        info!(
            home = %self.home,
            samples = buffered.index.len(),
            file = %self.buffered_path().display(),
            "household_timeline_written"
        );

        let slices = daily::extract_days(&buffered, &days);
        let mut empty_days = 0;
        for slice in &slices {
            if slice.is_empty() {
                empty_days += 1;
            }
            csv_output::write_daily_slice(&self.daily_path(slice.date), slice)?;
        }
        info!(
            home = %self.home,
            days = slices.len(),
            empty_days,
            dir = %self.daily_dir.display(),
            "daily_slices_written"
        );

        Ok(GroundTruthReport {
            home: self.home.clone(),
            occupants: logs.len(),
            samples: buffered.index.len(),
            occupied_samples: buffered.occupied.iter().filter(|v| **v == 1).count(),
            days_written: slices.len(),
            empty_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let job = GroundTruthJob::new("/data/H1-red", None);
        assert_eq!(job.home.as_str(), "H1");
        assert_eq!(job.daily_dir, PathBuf::from("/data/H1-red/Inference_DB/GroundTruth"));
        assert_eq!(
            job.buffered_path(),
            PathBuf::from("/data/H1-red/Inference_DB/Full_inferences/H1_occupancy_buffer.csv")
        );
    }

    #[test]
    fn test_save_layout() {
        let job = GroundTruthJob::new("/data/H4-black/", Some(Path::new("/out")));
        assert_eq!(job.home.as_str(), "H4");
        let date = chrono::NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        assert_eq!(
            job.daily_path(date),
            PathBuf::from("/out/H4-GROUNDTRUTH/2019-05-01_H4_groundtruth.csv")
        );
    }
}
