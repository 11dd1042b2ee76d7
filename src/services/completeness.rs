//! Per-day completeness of each sensing modality
//!
//! Each hub contributes one column per modality (`RS1_Audio`, `RS1_Img`,
//! `RS1_Img_dark`, `RS1_Env`) plus a single `Occupancy` column from the
//! daily ground truth files. A cell is the fraction of the expected samples
//! that exist for that day, rounded to two significant digits.

use anyhow::Context;
use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::domain::types::HomeId;
use crate::infra::Config;
use crate::io::dataset;
use crate::io::modality_files;

/// Fraction per day for one column
pub type DayCounts = BTreeMap<NaiveDate, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Audio,
    Images,
    DarkImages,
    Environmental,
}

impl Modality {
    /// Column suffix in the count table
    pub fn column_suffix(&self) -> &str {
        match self {
            Modality::Audio => "Audio",
            Modality::Images => "Img",
            Modality::DarkImages => "Img_dark",
            Modality::Environmental => "Env",
        }
    }

    /// Folder suffix in the dataset layout
    pub fn dir_suffix(&self) -> &str {
        match self {
            Modality::Audio => "audio",
            Modality::Images | Modality::DarkImages => "images",
            Modality::Environmental => "env",
        }
    }

    pub fn column(&self, hub: &str) -> String {
        format!("{hub}_{}", self.column_suffix())
    }
}

/// Round to `digits` significant digits
pub fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    (value * factor).round() / factor
}

/// Completeness fraction of `count` against `expected`
pub fn fraction(count: usize, expected: u32) -> f64 {
    if expected == 0 || count == 0 {
        return 0.0;
    }
    round_significant(count as f64 / f64::from(expected), 2)
}

/// Distinct capture times in file names of the form `<...>_<time>_<...>`
pub fn distinct_time_tokens<'a, I>(names: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().filter_map(|n| n.split('_').nth(1)).collect::<FxHashSet<_>>().len()
}

/// Count table keyed by column name, then day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountTable {
    columns: BTreeMap<String, DayCounts>,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, counts: DayCounts) {
        self.columns.insert(column.into(), counts);
    }

    pub fn extend(&mut self, other: CountTable) {
        self.columns.extend(other.columns);
    }

    pub fn column(&self, name: &str) -> Option<&DayCounts> {
        self.columns.get(name)
    }

    /// Column names in sorted order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Every day present in any column, sorted
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> =
            self.columns.values().flat_map(|c| c.keys().copied()).collect();
        days.sort();
        days.dedup();
        days
    }

    pub fn get(&self, column: &str, day: NaiveDate) -> Option<f64> {
        self.columns.get(column).and_then(|c| c.get(&day)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn hub_of(column: &str) -> &str {
    column.split('_').next().unwrap_or(column)
}

/// Add dark-image fractions to image fractions, pairing columns by sorted hub
///
/// A hub mismatch skips the column and a day missing from the dark column
/// skips that day, both with a warning.
pub fn combine_images(images: &CountTable, dark: &CountTable) -> CountTable {
    let mut combined = CountTable::new();

    for ((img_col, img_counts), (dark_col, dark_counts)) in
        images.columns.iter().zip(dark.columns.iter())
    {
        if hub_of(img_col) != hub_of(dark_col) {
            warn!(images = %img_col, dark = %dark_col, "modality_hub_mismatch_skipped");
            continue;
        }

        let mut counts = DayCounts::new();
        for (day, img) in img_counts {
            match dark_counts.get(day) {
                Some(d) => {
                    counts.insert(*day, img + d);
                }
                None => {
                    warn!(column = %img_col, day = %day, "dark_count_missing_day_skipped");
                }
            }
        }
        combined.insert(img_col.clone(), counts);
    }

    combined
}

/// Counts every modality of one home over its configured days
pub struct ModalityCounter<'a> {
    config: &'a Config,
    root: PathBuf,
    home: HomeId,
    days: FxHashSet<NaiveDate>,
}

impl<'a> ModalityCounter<'a> {
    pub fn new(
        config: &'a Config,
        root: impl Into<PathBuf>,
        home: HomeId,
        days: &[NaiveDate],
    ) -> Self {
        Self { config, root: root.into(), home, days: days.iter().copied().collect() }
    }

    fn wanted<T>(&self, entries: Vec<(NaiveDate, T)>) -> Vec<(NaiveDate, T)> {
        entries.into_iter().filter(|(d, _)| self.days.contains(d)).collect()
    }

    fn count_per_minute_files(
        &self,
        hub: &str,
        modality: Modality,
        ext: &str,
        expected: u32,
    ) -> anyhow::Result<DayCounts> {
        let dir = dataset::modality_dir(&self.root, &self.home, hub, modality.dir_suffix());
        let days = self.wanted(dataset::day_dirs(&dir)?);
        info!(
            hub = %hub,
            modality = %modality.column_suffix(),
            days = days.len(),
            "counting_modality"
        );

        let mut counts = DayCounts::new();
        for (day, day_dir) in days {
            let names = dataset::minute_file_names(&day_dir, ext)?;
            let distinct = distinct_time_tokens(names.iter().map(String::as_str));
            counts.insert(day, fraction(distinct, expected));
        }
        Ok(counts)
    }

    /// Distinct audio captures per day
    pub fn count_audio(&self, hub: &str) -> anyhow::Result<DayCounts> {
        self.count_per_minute_files(hub, Modality::Audio, "csv", self.config.audio_max_files())
    }

    /// Distinct image captures per day
    pub fn count_images(&self, hub: &str) -> anyhow::Result<DayCounts> {
        self.count_per_minute_files(hub, Modality::Images, "png", self.config.image_max_files())
    }

    /// Environmental rows with every configured reading present
    pub fn count_env(&self, hub: &str) -> anyhow::Result<DayCounts> {
        let suffix = Modality::Environmental.dir_suffix();
        let dir = dataset::modality_dir(&self.root, &self.home, hub, suffix);
        let files = self.wanted(dataset::env_day_files(&dir)?);
        info!(hub = %hub, modality = "Env", days = files.len(), "counting_modality");

        let mut counts = DayCounts::new();
        for (day, path) in files {
            let complete = modality_files::count_complete_rows(&path, self.config.env_columns())?;
            counts.insert(day, fraction(complete, self.config.env_max_samples()));
        }
        Ok(counts)
    }

    /// Dark image percentages from the per-hub summary, if one is configured
    pub fn read_dark(&self, hub: &str) -> anyhow::Result<Option<DayCounts>> {
        let Some(pattern) = self.config.dark_summary() else {
            return Ok(None);
        };
        let path = pattern.replace("{home}", self.home.as_str()).replace("{hub}", hub);
        let all = modality_files::read_dark_summary(Path::new(&path))?;
        Ok(Some(all.into_iter().filter(|(d, _)| self.days.contains(d)).collect()))
    }

    /// Occupied samples per day from daily ground truth files
    pub fn count_occupancy(&self, groundtruth_dir: &Path) -> anyhow::Result<DayCounts> {
        let files = self.wanted(dataset::groundtruth_day_files(groundtruth_dir)?);
        info!(days = files.len(), "counting_occupancy");

        let mut counts = DayCounts::new();
        for (day, path) in files {
            let occupied = modality_files::count_occupied_rows(&path)
                .with_context(|| format!("Failed to count occupancy in {}", path.display()))?;
            counts.insert(day, fraction(occupied, self.config.occupancy_max_samples()));
        }
        Ok(counts)
    }

    /// Full count table for every configured hub
    pub fn run(&self, groundtruth_dir: Option<&Path>) -> anyhow::Result<CountTable> {
        let mut audio = CountTable::new();
        let mut images = CountTable::new();
        let mut dark = CountTable::new();
        let mut env = CountTable::new();

        for hub in self.config.hubs() {
            audio.insert(Modality::Audio.column(hub), self.count_audio(hub)?);
            images.insert(Modality::Images.column(hub), self.count_images(hub)?);
            env.insert(Modality::Environmental.column(hub), self.count_env(hub)?);
            if let Some(counts) = self.read_dark(hub)? {
                dark.insert(Modality::DarkImages.column(hub), counts);
            }
        }

        let mut table = CountTable::new();
        if dark.is_empty() {
            table.extend(images);
        } else {
            table.extend(combine_images(&images, &dark));
            table.extend(dark);
        }
        table.extend(env);
        table.extend(audio);

        if let Some(dir) = groundtruth_dir {
            table.insert("Occupancy", self.count_occupancy(dir)?);
        }

        Ok(table)
    }
}
