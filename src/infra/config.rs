//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/hpd.toml
//!
//! A missing file falls back to the defaults below, which carry the day
//! ranges of the published dataset.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::services::buffer::DEFAULT_BUFFER_MINUTES;
use crate::services::daily::HomeSchedule;

/// Raw `home -> [[start, end], ...]` table as written in TOML or JSON
pub type RawSchedule = HashMap<String, Vec<[String; 2]>>;

#[derive(Debug, Clone, Deserialize)]
pub struct GroundTruthConfig {
    #[serde(default = "default_sample_interval_secs")]
    pub sample_interval_secs: u32,
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: u32,
}

impl Default for GroundTruthConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: default_sample_interval_secs(),
            buffer_minutes: default_buffer_minutes(),
        }
    }
}

fn default_sample_interval_secs() -> u32 {
    10
}

fn default_buffer_minutes() -> u32 {
    DEFAULT_BUFFER_MINUTES
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountsConfig {
    /// Expected audio files per day (one per 10 s)
    #[serde(default = "default_audio_max_files")]
    pub audio_max_files: u32,
    /// Expected images per day (one per second)
    #[serde(default = "default_image_max_files")]
    pub image_max_files: u32,
    /// Expected environmental readings per day
    #[serde(default = "default_env_max_samples")]
    pub env_max_samples: u32,
    /// Expected ground truth samples per day
    #[serde(default = "default_occupancy_max_samples")]
    pub occupancy_max_samples: u32,
    /// Environmental columns that must all be present for a row to count
    #[serde(default = "default_env_columns")]
    pub env_columns: Vec<String>,
    /// Per-hub dark image summary, `{home}` and `{hub}` are substituted
    #[serde(default)]
    pub dark_summary: Option<String>,
}

impl Default for CountsConfig {
    fn default() -> Self {
        Self {
            audio_max_files: default_audio_max_files(),
            image_max_files: default_image_max_files(),
            env_max_samples: default_env_max_samples(),
            occupancy_max_samples: default_occupancy_max_samples(),
            env_columns: default_env_columns(),
            dark_summary: None,
        }
    }
}

fn default_audio_max_files() -> u32 {
    8640
}

fn default_image_max_files() -> u32 {
    86400
}

fn default_env_max_samples() -> u32 {
    8640
}

fn default_occupancy_max_samples() -> u32 {
    8640
}

fn default_env_columns() -> Vec<String> {
    ["tvoc_ppb", "temp_c", "rh_percent", "light_lux", "co2eq_ppm", "dist_mm"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_hubs")]
    pub hubs: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { hubs: default_hubs() }
    }
}

fn default_hubs() -> Vec<String> {
    ["RS1", "RS2", "RS3", "RS4", "RS5"].iter().map(|h| h.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub groundtruth: GroundTruthConfig,
    #[serde(default)]
    pub counts: CountsConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Home -> list of [start, end] ISO dates
    #[serde(default)]
    pub homes: RawSchedule,
}

/// Main configuration struct used throughout the tools
#[derive(Debug, Clone)]
pub struct Config {
    sample_interval_secs: u32,
    buffer_minutes: u32,
    audio_max_files: u32,
    image_max_files: u32,
    env_max_samples: u32,
    occupancy_max_samples: u32,
    env_columns: Vec<String>,
    dark_summary: Option<String>,
    hubs: Vec<String>,
    schedule: HomeSchedule,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        let counts = CountsConfig::default();
        let groundtruth = GroundTruthConfig::default();
        Self {
            sample_interval_secs: groundtruth.sample_interval_secs,
            buffer_minutes: groundtruth.buffer_minutes,
            audio_max_files: counts.audio_max_files,
            image_max_files: counts.image_max_files,
            env_max_samples: counts.env_max_samples,
            occupancy_max_samples: counts.occupancy_max_samples,
            env_columns: counts.env_columns,
            dark_summary: counts.dark_summary,
            hubs: default_hubs(),
            schedule: Self::default_schedule(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Day ranges of the published dataset
    fn default_schedule() -> HomeSchedule {
        let raw: &[(&str, &[(&str, &str)])] = &[
            ("H1", &[("2019-11-26", "2019-12-25")]),
            ("H2", &[("2019-03-13", "2019-03-29")]),
            ("H3", &[("2019-07-23", "2019-08-04"), ("2019-08-15", "2019-09-05")]),
            ("H4", &[("2019-05-01", "2019-05-12"), ("2019-05-17", "2019-05-21")]),
            ("H5", &[("2019-06-07", "2019-06-21")]),
            ("H6", &[("2019-10-12", "2019-11-02"), ("2019-11-20", "2019-12-05")]),
        ];
        let mut schedule = HomeSchedule::new();
        for (home, ranges) in raw {
            let parsed = ranges
                .iter()
                .filter_map(|(s, e)| crate::services::daily::DateRange::parse(s, e).ok())
                .collect();
            schedule.insert(*home, parsed);
        }
        schedule
    }

    /// Determine config file path from the command line or environment
    pub fn resolve_config_path(cli: Option<&str>) -> String {
        if let Some(path) = cli {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/hpd.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        // An empty [homes] table keeps the dataset defaults
        let schedule = if toml_config.homes.is_empty() {
            Self::default_schedule()
        } else {
            schedule_from_raw(&toml_config.homes)
                .with_context(|| format!("Invalid [homes] table in {}", path.display()))?
        };

        Ok(Self {
            sample_interval_secs: toml_config.groundtruth.sample_interval_secs,
            buffer_minutes: toml_config.groundtruth.buffer_minutes,
            audio_max_files: toml_config.counts.audio_max_files,
            image_max_files: toml_config.counts.image_max_files,
            env_max_samples: toml_config.counts.env_max_samples,
            occupancy_max_samples: toml_config.counts.occupancy_max_samples,
            env_columns: toml_config.counts.env_columns,
            dark_summary: toml_config.counts.dark_summary,
            hubs: toml_config.dataset.hubs,
            schedule,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - falls back to defaults only when the file is absent
    ///
    /// A file that exists but does not parse, or carries an invalid `[homes]`
    /// table, is an error.
    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            warn!(config_file = %path, "config_file_missing_using_defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Load configuration from the `--config` value or environment
    pub fn load(cli: Option<&str>) -> anyhow::Result<Self> {
        Self::load_from_path(&Self::resolve_config_path(cli))
    }

    /// Replace the date schedule with one read from a `start_end_dates.json` file
    pub fn with_schedule_file<P: AsRef<Path>>(mut self, path: P) -> anyhow::Result<Self> {
        self.schedule = load_schedule_json(path)?;
        Ok(self)
    }

    pub fn with_schedule(mut self, schedule: HomeSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn sample_interval_secs(&self) -> u32 {
        self.sample_interval_secs
    }

    pub fn buffer_minutes(&self) -> u32 {
        self.buffer_minutes
    }

    pub fn audio_max_files(&self) -> u32 {
        self.audio_max_files
    }

    pub fn image_max_files(&self) -> u32 {
        self.image_max_files
    }

    pub fn env_max_samples(&self) -> u32 {
        self.env_max_samples
    }

    pub fn occupancy_max_samples(&self) -> u32 {
        self.occupancy_max_samples
    }

    pub fn env_columns(&self) -> &[String] {
        &self.env_columns
    }

    pub fn dark_summary(&self) -> Option<&str> {
        self.dark_summary.as_deref()
    }

    pub fn hubs(&self) -> &[String] {
        &self.hubs
    }

    pub fn schedule(&self) -> &HomeSchedule {
        &self.schedule
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}

fn schedule_from_raw(raw: &RawSchedule) -> anyhow::Result<HomeSchedule> {
    let pairs = raw.iter().map(|(home, ranges)| (home.as_str(), ranges.as_slice()));
    Ok(HomeSchedule::from_pairs(pairs)?)
}

/// Read a JSON `{"H1": [["2019-11-26", "2019-12-25"]], ...}` date schedule
pub fn load_schedule_json<P: AsRef<Path>>(path: P) -> anyhow::Result<HomeSchedule> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read date schedule {}", path.display()))?;
    let raw: RawSchedule = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse date schedule {}", path.display()))?;
    schedule_from_raw(&raw).with_context(|| format!("Invalid date schedule {}", path.display()))
}
