//! CSV egress - writes signals, daily slices and summaries
//!
//! Every file starts with a `timestamp` (or key) column; timestamps are
//! written as `YYYY-MM-DD HH:MM:SS`. Parent directories are created on demand.

use anyhow::Context;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::domain::signal::{BufferedSignal, DailySlice, HouseholdSignal};
use crate::io::occupant_log::TIMESTAMP_FORMAT;
use crate::services::completeness::CountTable;
use crate::services::label_validation::{HubValidation, LabelRow};

fn create_writer(path: &Path) -> anyhow::Result<Writer<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))
}

fn finish(mut writer: Writer<File>, path: &Path, rows: usize) -> anyhow::Result<()> {
    writer.flush().with_context(|| format!("Failed to flush {}", path.display()))?;
    debug!(file = %path.display(), rows, "csv_written");
    Ok(())
}

/// Full buffered household timeline: `timestamp, occupied`
pub fn write_buffered_timeline(path: &Path, signal: &BufferedSignal) -> anyhow::Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(["timestamp", "occupied"])?;
    for (i, t) in signal.index.iter().enumerate() {
        let timestamp = t.format(TIMESTAMP_FORMAT).to_string();
        writer.write_record([timestamp, signal.occupied[i].to_string()])?;
    }
    finish(writer, path, signal.index.len())
}

/// Unbuffered timeline with one column per occupant: `timestamp, <occupants>, occupied`
pub fn write_raw_timeline(path: &Path, signal: &HouseholdSignal) -> anyhow::Result<()> {
    let mut writer = create_writer(path)?;

    let mut header = vec!["timestamp".to_string()];
    header.extend(signal.occupants.iter().map(|o| o.occupant.to_string()));
    header.push("occupied".to_string());
    writer.write_record(&header)?;

    for (i, t) in signal.index.iter().enumerate() {
        let mut row = Vec::with_capacity(header.len());
        row.push(t.format(TIMESTAMP_FORMAT).to_string());
        for occupant in &signal.occupants {
            row.push(occupant.samples[i].as_bit().unwrap_or(0).to_string());
        }
        row.push(signal.occupied[i].to_string());
        writer.write_record(&row)?;
    }
    finish(writer, path, signal.index.len())
}

/// One day of the buffered signal: `timestamp, occupied, number`
pub fn write_daily_slice(path: &Path, slice: &DailySlice) -> anyhow::Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(["timestamp", "occupied", "number"])?;
    for row in &slice.rows {
        writer.write_record([
            row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            row.occupied.to_string(),
            row.number.to_string(),
        ])?;
    }
    finish(writer, path, slice.rows.len())
}

/// Completeness table: `day, <columns sorted>`; missing cells are empty
pub fn write_count_table(path: &Path, table: &CountTable) -> anyhow::Result<()> {
    let mut writer = create_writer(path)?;
    let columns = table.column_names();

    let mut header = vec!["day"];
    header.extend(columns.iter().copied());
    writer.write_record(&header)?;

    let days = table.days();
    for day in &days {
        let mut row = vec![day.format("%Y-%m-%d").to_string()];
        for column in &columns {
            row.push(table.get(column, *day).map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&row)?;
    }
    finish(writer, path, days.len())
}

#[derive(Serialize)]
struct LabelRecord {
    timestamp: String,
    predicted: u8,
    probability: Option<f64>,
    actual: u8,
}

/// Merged prediction / label rows of one hub
pub fn write_labels(path: &Path, rows: &[LabelRow]) -> anyhow::Result<()> {
    let mut writer = create_writer(path)?;
    for row in rows {
        writer.serialize(LabelRecord {
            timestamp: row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            predicted: row.predicted,
            probability: row.probability,
            actual: row.actual,
        })?;
    }
    finish(writer, path, rows.len())
}

#[derive(Serialize)]
struct MetricsRecord<'a> {
    hub: &'a str,
    fp: usize,
    tp: usize,
    #[serde(rename = "fn")]
    fn_: usize,
    tn: usize,
}

/// Confusion summary per hub: `hub, fp, tp, fn, tn`
pub fn write_metrics(path: &Path, hubs: &[HubValidation]) -> anyhow::Result<()> {
    let mut writer = create_writer(path)?;
    for hub in hubs {
        writer.serialize(MetricsRecord {
            hub: &hub.hub,
            fp: hub.summary.fp,
            tp: hub.summary.tp,
            fn_: hub.summary.fn_,
            tn: hub.summary.tn,
        })?;
    }
    finish(writer, path, hubs.len())
}
