//! Readers for the per-day modality files used in completeness counting

use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::BTreeMap;
use std::path::Path;

fn column_index(headers: &StringRecord, name: &str, path: &Path) -> anyhow::Result<usize> {
    match headers.iter().position(|h| h == name) {
        Some(i) => Ok(i),
        None => bail!("column {name:?} missing in {}", path.display()),
    }
}

fn is_missing(field: &str) -> bool {
    field.is_empty() || field.eq_ignore_ascii_case("nan")
}

/// Rows of a headed CSV where every listed column holds a value
pub fn count_complete_rows(path: &Path, columns: &[String]) -> anyhow::Result<usize> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers = rdr.headers()?.clone();
    let indices = columns
        .iter()
        .map(|c| column_index(&headers, c, path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut complete = 0;
    for result in rdr.records() {
        let record = result.with_context(|| format!("Malformed row in {}", path.display()))?;
        if indices.iter().all(|&i| record.get(i).is_some_and(|f| !is_missing(f))) {
            complete += 1;
        }
    }
    Ok(complete)
}

/// Rows of a ground truth file whose `occupied` column is 1
pub fn count_occupied_rows(path: &Path) -> anyhow::Result<usize> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers = rdr.headers()?.clone();
    let occupied = column_index(&headers, "occupied", path)?;

    let mut count = 0;
    for result in rdr.records() {
        let record = result?;
        let value = record.get(occupied).and_then(|f| f.parse::<f64>().ok());
        if value == Some(1.0) {
            count += 1;
        }
    }
    Ok(count)
}

/// Space-delimited image summary with `day` and `%Dark` columns
pub fn read_dark_summary(path: &Path) -> anyhow::Result<BTreeMap<NaiveDate, f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open dark summary {}", path.display()))?;

    let headers = rdr.headers()?.clone();
    let day_col = column_index(&headers, "day", path)?;
    let dark_col = column_index(&headers, "%Dark", path)?;

    let mut out = BTreeMap::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let (Some(day), Some(dark)) = (record.get(day_col), record.get(dark_col)) else {
            bail!("row {} of {} is too short", i + 2, path.display());
        };
        let day = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .with_context(|| format!("Bad day {day:?} in {}", path.display()))?;
        let dark: f64 =
            dark.parse().with_context(|| format!("Bad %Dark {dark:?} in {}", path.display()))?;
        out.insert(day, dark);
    }
    Ok(out)
}
