//! Occupant log reader
//!
//! One CSV per occupant, no header. Column 2 is the status ("entered" /
//! "exited"), column 3 the time as written by the logging service, e.g.
//! `March 3, 2019 at 2:15PM`. Rows are kept in file order.

use anyhow::Context;
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::debug;

use crate::domain::types::{OccupantEvent, OccupantLog, OccupantStatus};
use crate::domain::InputError;

/// Format of the log time once the " at " separator is removed
const LOG_TIME_FORMAT: &str = "%B %d, %Y %I:%M%p";

/// Formats accepted for machine-written timestamps
const ISO_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Output format for every timestamp column the tools write
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an occupant log time (`March 3, 2019 at 2:15PM`) or an ISO timestamp
pub fn parse_log_timestamp(raw: &str) -> Result<NaiveDateTime, InputError> {
    let trimmed = raw.trim();

    if let Some((day, time)) = trimmed.split_once(" at ") {
        let time: String = time.chars().filter(|c| !c.is_whitespace()).collect();
        let joined = format!("{} {}", day.trim(), time);
        return NaiveDateTime::parse_from_str(&joined, LOG_TIME_FORMAT)
            .map_err(|_| InputError::Timestamp(raw.to_string()));
    }

    parse_iso_timestamp(trimmed)
}

/// Parse a timestamp in one of the ISO-like formats the tools read and write
pub fn parse_iso_timestamp(raw: &str) -> Result<NaiveDateTime, InputError> {
    let trimmed = raw.trim();
    ISO_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| InputError::Timestamp(raw.to_string()))
}

/// Occupant name from a log file name: `H1-Alice.csv` -> `Alice`
pub fn occupant_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    match stem.split('-').nth(1) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => stem.to_string(),
    }
}

/// Parse the rows of one occupant log
pub fn parse_occupant_events<R: std::io::Read>(
    reader: R,
) -> Result<Vec<OccupantEvent>, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 1;
        let record =
            result.map_err(|e| InputError::Row { line, reason: e.to_string() })?;
        if record.len() < 3 {
            return Err(InputError::Row {
                line,
                reason: format!("expected at least 3 columns, got {}", record.len()),
            });
        }
        let status: OccupantStatus = record[1].parse()?;
        let timestamp = parse_log_timestamp(&record[2])?;
        events.push(OccupantEvent::new(status, timestamp));
    }
    Ok(events)
}

/// Read one occupant log file
pub fn read_occupant_log(path: &Path) -> anyhow::Result<OccupantLog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open occupant log {}", path.display()))?;
    let events = parse_occupant_events(file)
        .with_context(|| format!("Malformed occupant log {}", path.display()))?;

    let log = OccupantLog::new(occupant_name(path), events);
    debug!(
        occupant = %log.occupant,
        events = log.events.len(),
        file = %path.display(),
        "occupant_log_read"
    );
    Ok(log)
}
