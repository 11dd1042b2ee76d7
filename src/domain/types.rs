//! Shared types for the occupancy dataset tools

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::InputError;

/// Newtype wrapper for home identifiers ("H1", "H2", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HomeId(pub String);

impl HomeId {
    /// Derive the home id from a dataset folder name, e.g. `H1-red` -> `H1`
    pub fn from_folder_name(name: &str) -> Self {
        let trimmed = name.trim_matches('/');
        let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let id = base.split('-').next().unwrap_or(base);
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for occupant identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupantId(pub String);

impl std::fmt::Display for OccupantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status recorded in an occupant log row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupantStatus {
    Entered,
    Exited,
}

impl std::str::FromStr for OccupantStatus {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entered" => Ok(OccupantStatus::Entered),
            "exited" => Ok(OccupantStatus::Exited),
            other => Err(InputError::Status(other.to_string())),
        }
    }
}

impl OccupantStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OccupantStatus::Entered => "entered",
            OccupantStatus::Exited => "exited",
        }
    }
}

/// One entry/exit row from an occupant log
#[derive(Debug, Clone, PartialEq)]
pub struct OccupantEvent {
    pub status: OccupantStatus,
    pub timestamp: NaiveDateTime,
}

impl OccupantEvent {
    #[inline]
    pub fn new(status: OccupantStatus, timestamp: NaiveDateTime) -> Self {
        Self { status, timestamp }
    }
}

/// All events for one occupant, in file order
#[derive(Debug, Clone)]
pub struct OccupantLog {
    pub occupant: OccupantId,
    pub events: Vec<OccupantEvent>,
}

impl OccupantLog {
    pub fn new(occupant: impl Into<String>, events: Vec<OccupantEvent>) -> Self {
        Self { occupant: OccupantId(occupant.into()), events }
    }

    /// Timestamp of the first row in file order
    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.events.first().map(|e| e.timestamp)
    }

    /// Timestamp of the last row in file order
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.events.last().map(|e| e.timestamp)
    }
}

/// Per-sample presence during reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Unknown,
    Vacant,
    Occupied,
}

impl Presence {
    /// 0/1 value of a resolved sample, None while unresolved
    pub fn as_bit(&self) -> Option<u8> {
        match self {
            Presence::Unknown => None,
            Presence::Vacant => Some(0),
            Presence::Occupied => Some(1),
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Presence::Occupied)
    }
}
