//! Domain models - occupancy events, signals and input errors
//!
//! This module contains the canonical data types used throughout the tools:
//! - `OccupantEvent` / `OccupantLog` - entry/exit rows from one occupant's log
//! - `Presence` - per-sample presence during reconstruction
//! - `TimeIndex` - the regular timestamp grid shared by a household
//! - `HouseholdSignal`, `BufferedSignal`, `DailySlice` - derived signals
//! - `InputError` - fatal input validation failures

pub mod error;
pub mod signal;
pub mod types;

// Re-export commonly used types at module level
pub use error::InputError;
pub use signal::{
    BufferedSignal, DailySlice, HouseholdSignal, OccupantTimeline, SignalRow, TimeIndex,
};
pub use types::{HomeId, OccupantEvent, OccupantId, OccupantLog, OccupantStatus, Presence};
