//! Dataset layout - locating occupant logs, modality folders and label images
//!
//! Layout of a home folder (`H1-red/`):
//!   GroundTruth/<home>-<occupant>.csv
//! Layout of a modality root:
//!   <home>-<hub>-audio/<YYYY-MM-DD>/<HHMM>/<...>_<time>_<...>.csv
//!   <home>-<hub>-images/<YYYY-MM-DD>/<HHMM>/<...>_<time>_<...>.png
//!   <home>-<hub>-env/<...>_<...>_<YYYY-MM-DD>.csv
//! Ground truth output:
//!   <YYYY-MM-DD>_<home>_groundtruth.csv

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::types::HomeId;
use crate::domain::InputError;

/// Sorted paths matching a glob pattern rooted at `dir`
///
/// `dir` is matched literally; only `pattern` carries wildcards.
pub fn glob_sorted(dir: &Path, pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let full = format!("{}/{}", glob::Pattern::escape(&dir.to_string_lossy()), pattern);
    let mut paths = glob::glob(&full)
        .with_context(|| format!("Invalid glob pattern {full}"))?
        .collect::<Result<Vec<PathBuf>, _>>()
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Occupant logs of a home folder; an empty result is fatal
pub fn occupant_log_paths(home_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let paths = glob_sorted(&home_dir.join("GroundTruth"), "*.csv")?;
    if paths.is_empty() {
        return Err(InputError::NoOccupantLogs(home_dir.join("GroundTruth")).into());
    }
    debug!(home_dir = %home_dir.display(), logs = paths.len(), "occupant_logs_found");
    Ok(paths)
}

/// Folder holding one modality of one hub: `<root>/<home>-<hub>-<suffix>`
pub fn modality_dir(root: &Path, home: &HomeId, hub: &str, suffix: &str) -> PathBuf {
    root.join(format!("{home}-{hub}-{suffix}"))
}

/// Per-day subfolders (`YYYY-MM-DD`) of a modality folder
pub fn day_dirs(dir: &Path) -> anyhow::Result<Vec<(NaiveDate, PathBuf)>> {
    let dirs = glob_sorted(dir, "20*")?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| {
            let date = NaiveDate::parse_from_str(file_name(&p), "%Y-%m-%d").ok()?;
            Some((date, p))
        })
        .collect();
    Ok(dirs)
}

/// Per-day environmental files (`<...>_<YYYY-MM-DD>.csv`)
pub fn env_day_files(dir: &Path) -> anyhow::Result<Vec<(NaiveDate, PathBuf)>> {
    let files = glob_sorted(dir, "*_20*.csv")?
        .into_iter()
        .filter_map(|p| {
            let token = file_stem(&p).rsplit('_').next()?;
            let date = NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()?;
            Some((date, p))
        })
        .collect();
    Ok(files)
}

/// Daily ground truth files (`<YYYY-MM-DD>_<home>_groundtruth.csv`)
pub fn groundtruth_day_files(dir: &Path) -> anyhow::Result<Vec<(NaiveDate, PathBuf)>> {
    let files = glob_sorted(dir, "*_groundtruth.csv")?
        .into_iter()
        .filter_map(|p| {
            let token = file_name(&p).split('_').next()?;
            let date = NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()?;
            Some((date, p))
        })
        .collect();
    Ok(files)
}

/// File names of every `<minute>/<file>.<ext>` entry below a day folder
pub fn minute_file_names(day_dir: &Path, ext: &str) -> anyhow::Result<Vec<String>> {
    let names = glob_sorted(day_dir, &format!("*/*.{ext}"))?
        .iter()
        .map(|p| file_name(p).to_string())
        .collect();
    Ok(names)
}

/// Capture time of a labelled image: `2019-11-26_080010_RS1_H1.png`
pub fn parse_image_timestamp(name: &str) -> Result<NaiveDateTime, InputError> {
    let mut parts = name.split('_');
    let (Some(day), Some(time)) = (parts.next(), parts.next()) else {
        return Err(InputError::Timestamp(name.to_string()));
    };
    NaiveDateTime::parse_from_str(&format!("{day}_{time}"), "%Y-%m-%d_%H%M%S")
        .map_err(|_| InputError::Timestamp(name.to_string()))
}

/// Capture times of the labelled images of one hub and class folder
///
/// Images are named `<date>_<time>_<hub>_<home>.png`; anything else in the
/// folder is skipped with a warning.
pub fn labelled_image_times(
    hub_dir: &Path,
    class: &str,
    hub: &str,
    home: &HomeId,
) -> anyhow::Result<Vec<NaiveDateTime>> {
    let pattern = format!("{class}/*_{hub}_{home}.png");
    let mut times = Vec::new();
    for path in glob_sorted(hub_dir, &pattern)? {
        match parse_image_timestamp(file_name(&path)) {
            Ok(t) => times.push(t),
            Err(e) => warn!(file = %path.display(), error = %e, "image_name_unparsable"),
        }
    }
    Ok(times)
}

/// Subfolders of `dir` whose name starts with `prefix`, sorted
pub fn subdirs_with_prefix(dir: &Path, prefix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let dirs = glob_sorted(dir, &format!("{prefix}*"))?;
    Ok(dirs.into_iter().filter(|p| p.is_dir()).collect())
}

/// Base name of a path as an owned string
pub fn base_name(path: &Path) -> String {
    file_name(path).to_string()
}
