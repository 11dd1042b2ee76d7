//! Services - the batch transforms
//!
//! This module contains the processing logic of the tools:
//! - `reconstructor` - per-occupant timelines and household combination
//! - `buffer` - bounded forward/backward gap filling
//! - `daily` - date schedule and daily slicing
//! - `groundtruth` - end-to-end ground truth job for one home folder
//! - `completeness` - per-day, per-modality completeness counts
//! - `label_validation` - confusion counts of image predictions

pub mod buffer;
pub mod completeness;
pub mod daily;
pub mod groundtruth;
pub mod label_validation;
pub mod reconstructor;

// Re-export commonly used types
pub use buffer::apply_buffer;
pub use completeness::{CountTable, ModalityCounter};
pub use daily::{DateRange, HomeSchedule};
pub use groundtruth::{GroundTruthJob, GroundTruthReport};
pub use reconstructor::reconstruct_household;
