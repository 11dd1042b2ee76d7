//! IO modules - dataset files in and out
//!
//! This module contains all filesystem operations:
//! - `occupant_log` - occupant entry/exit CSV reader and timestamp parsing
//! - `dataset` - locating occupant logs, modality folders and labelled images
//! - `modality_files` - readers for environmental, ground truth and dark summaries
//! - `predictions` - image classifier prediction reader
//! - `csv_output` - CSV writers for every artifact the tools produce

pub mod csv_output;
pub mod dataset;
pub mod modality_files;
pub mod occupant_log;
pub mod predictions;

// Re-export commonly used functions
pub use occupant_log::{parse_log_timestamp, read_occupant_log, TIMESTAMP_FORMAT};
pub use predictions::read_predictions;
