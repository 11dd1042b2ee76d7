//! Input validation errors
//!
//! Every variant is fatal for the run that raised it; binaries surface them
//! through `anyhow` with file context attached.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unparsable timestamp {0:?}")]
    Timestamp(String),

    #[error("unknown occupant status {0:?}")]
    Status(String),

    #[error("malformed row {line}: {reason}")]
    Row { line: usize, reason: String },

    #[error("no occupant logs found under {0}")]
    NoOccupantLogs(PathBuf),

    #[error("no occupant has any logged event")]
    EmptyHousehold,

    #[error("home {0} has no configured date ranges")]
    UnknownHome(String),

    #[error("invalid date range [{start}, {end}]: {reason}")]
    DateRange { start: String, end: String, reason: String },

    #[error("sample interval must be a positive number of seconds")]
    SampleInterval,
}
