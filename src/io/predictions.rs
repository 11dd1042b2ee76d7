//! Reader for image classifier prediction files
//!
//! Headed CSV with `timestamp`, `occupied` and an optional `probability`
//! column. Other columns are ignored.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::io::occupant_log::parse_iso_timestamp;
use crate::services::label_validation::Prediction;

#[derive(Debug, Deserialize)]
struct PredictionRecord {
    timestamp: String,
    occupied: f64,
    #[serde(default)]
    probability: Option<f64>,
}

pub fn parse_predictions<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<Prediction>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut out = Vec::new();
    for (i, result) in rdr.deserialize::<PredictionRecord>().enumerate() {
        let record = result.with_context(|| format!("Malformed prediction row {}", i + 2))?;
        out.push(Prediction {
            timestamp: parse_iso_timestamp(&record.timestamp)?,
            occupied: u8::from(record.occupied >= 0.5),
            probability: record.probability,
        });
    }
    Ok(out)
}

pub fn read_predictions(path: &Path) -> anyhow::Result<Vec<Prediction>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open predictions {}", path.display()))?;
    parse_predictions(file)
        .with_context(|| format!("Failed to read predictions {}", path.display()))
}
