//! Ground truth reconstruction from occupant entry/exit logs
//!
//! Each occupant is a two-state machine (Away, Home) driven by the status
//! column of their log. Transitions close out the period that just ended:
//! - Away -> entered at `t`: unresolved samples before `t` are Vacant
//! - Home -> exited at `t`: unresolved samples before `t` are Occupied
//! - repeated statuses are no-ops
//!
//! A stay is therefore the half-open interval `[entered, exited)`. After the
//! last event every remaining sample takes the final state. Resolved
//! samples always form a prefix of the grid, so the walk only tracks a cursor.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::domain::signal::{HouseholdSignal, OccupantTimeline, TimeIndex};
use crate::domain::types::{OccupantLog, OccupantStatus, Presence};
use crate::domain::InputError;

/// Occupant state between two log rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OccupantState {
    Away,
    Home,
}

/// What a transition resolves on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// Samples strictly before the event become Vacant
    VacantBefore,
    /// Samples strictly before the event become Occupied
    OccupiedBefore,
    None,
}

impl OccupantState {
    fn from_status(status: OccupantStatus) -> Self {
        match status {
            OccupantStatus::Entered => OccupantState::Home,
            OccupantStatus::Exited => OccupantState::Away,
        }
    }

    fn transition(self, status: OccupantStatus) -> (Self, Resolution) {
        let resolution = match (self, status) {
            (OccupantState::Away, OccupantStatus::Entered) => Resolution::VacantBefore,
            (OccupantState::Home, OccupantStatus::Exited) => Resolution::OccupiedBefore,
            _ => Resolution::None,
        };
        (Self::from_status(status), resolution)
    }

    fn presence(self) -> Presence {
        match self {
            OccupantState::Away => Presence::Vacant,
            OccupantState::Home => Presence::Occupied,
        }
    }
}

/// Shared household grid: earliest first row to latest last row over all occupants
pub fn household_index(
    logs: &[OccupantLog],
    sample_interval_secs: u32,
) -> Result<TimeIndex, InputError> {
    let first = logs.iter().filter_map(OccupantLog::first_timestamp).min();
    let last = logs.iter().filter_map(OccupantLog::last_timestamp).max();

    let (Some(first), Some(last)) = (first, last) else {
        return Err(InputError::EmptyHousehold);
    };

    if last < first {
        warn!(first = %first, last = %last, "household_range_reversed");
    }

    TimeIndex::spanning(first, last, sample_interval_secs)
}

/// Reconstruct one occupant's presence over `index`
pub fn reconstruct_occupant(log: &OccupantLog, index: &TimeIndex) -> OccupantTimeline {
    let mut samples = vec![Presence::Unknown; index.len()];

    if log.events.is_empty() {
        warn!(occupant = %log.occupant, "occupant_without_events_assumed_away");
        samples.fill(Presence::Vacant);
        return OccupantTimeline { occupant: log.occupant.clone(), samples };
    }

    // Resolved samples are exactly samples[..cursor]
    let mut cursor = 0usize;
    let mut state = OccupantState::Away;

    for event in &log.events {
        let (next, resolution) = state.transition(event.status);
        let (end, value) = match resolution {
            Resolution::VacantBefore => (index.count_before(event.timestamp), Presence::Vacant),
            Resolution::OccupiedBefore => {
                (index.count_before(event.timestamp), Presence::Occupied)
            }
            Resolution::None => {
                debug!(
                    occupant = %log.occupant,
                    status = %event.status.as_str(),
                    timestamp = %event.timestamp,
                    "repeated_status_ignored"
                );
                (cursor, Presence::Unknown)
            }
        };
        if end > cursor {
            samples[cursor..end].fill(value);
            cursor = end;
        }
        state = next;
    }

    samples[cursor..].fill(state.presence());

    OccupantTimeline { occupant: log.occupant.clone(), samples }
}

/// Reconstruct every occupant and combine them into the household signal
pub fn reconstruct_household(
    logs: &[OccupantLog],
    sample_interval_secs: u32,
) -> Result<HouseholdSignal, InputError> {
    let index = household_index(logs, sample_interval_secs)?;
    let occupants: Vec<OccupantTimeline> =
        logs.iter().map(|log| reconstruct_occupant(log, &index)).collect();

    let mut occupied = vec![0u8; index.len()];
    let mut number = vec![0u8; index.len()];
    for timeline in &occupants {
        for (i, bit) in timeline.bits().enumerate() {
            occupied[i] = occupied[i].max(bit);
            number[i] = number[i].saturating_add(bit);
        }
    }

    debug!(
        occupants = occupants.len(),
        samples = index.len(),
        start = %index.start(),
        "household_reconstructed"
    );

    Ok(HouseholdSignal { index, occupants, occupied, number })
}

/// Earliest and latest timestamp seen in any log, for reporting
pub fn event_span(logs: &[OccupantLog]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut all = logs.iter().flat_map(|l| l.events.iter().map(|e| e.timestamp));
    let first = all.next()?;
    Some(all.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::OccupantEvent;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn log(name: &str, rows: &[(&str, &str)]) -> OccupantLog {
        let events = rows
            .iter()
            .map(|(status, t)| OccupantEvent::new(status.parse().unwrap(), ts(t)))
            .collect();
        OccupantLog::new(name, events)
    }

    fn bits(timeline: &OccupantTimeline) -> Vec<u8> {
        timeline.bits().collect()
    }

    #[test]
    fn test_two_occupant_scenario() {
        let logs = vec![
            log("A", &[("entered", "2019-03-01 08:00:00"), ("exited", "2019-03-01 08:00:20")]),
            log("B", &[("entered", "2019-03-01 08:00:10"), ("exited", "2019-03-01 08:00:40")]),
        ];
        let signal = reconstruct_household(&logs, 10).unwrap();

        assert_eq!(signal.index.len(), 5);
        assert_eq!(bits(&signal.occupants[0]), vec![1, 1, 0, 0, 0]);
        assert_eq!(bits(&signal.occupants[1]), vec![0, 1, 1, 1, 0]);
        // Household OR over the grid
        assert_eq!(signal.occupied, vec![1, 1, 1, 1, 0]);
        assert_eq!(signal.number, vec![1, 2, 1, 1, 0]);
    }

    #[test]
    fn test_household_is_disjunction() {
        let logs = vec![
            log(
                "A",
                &[
                    ("entered", "2019-03-01 08:00:00"),
                    ("exited", "2019-03-01 08:01:00"),
                    ("entered", "2019-03-01 08:03:00"),
                ],
            ),
            log(
                "B",
                &[
                    ("exited", "2019-03-01 08:00:30"),
                    ("entered", "2019-03-01 08:02:00"),
                    ("exited", "2019-03-01 08:04:00"),
                ],
            ),
        ];
        let signal = reconstruct_household(&logs, 10).unwrap();

        for i in 0..signal.index.len() {
            let any = signal.occupants.iter().any(|o| o.samples[i].is_occupied());
            assert_eq!(signal.occupied[i] == 1, any, "sample {i}");
        }
    }

    #[test]
    fn test_leading_entered_is_vacant_before() {
        let logs = vec![
            log("A", &[("entered", "2019-03-01 08:01:00"), ("exited", "2019-03-01 08:02:00")]),
            log("B", &[("entered", "2019-03-01 08:00:00"), ("exited", "2019-03-01 08:00:10")]),
        ];
        let signal = reconstruct_household(&logs, 10).unwrap();
        let a = &signal.occupants[0];
        let entry = signal.index.count_before(ts("2019-03-01 08:01:00"));
        let exit = signal.index.count_before(ts("2019-03-01 08:02:00"));

        assert_eq!((entry, exit, signal.index.len()), (6, 12, 13));
        assert!(a.samples[..entry].iter().all(|p| *p == Presence::Vacant));
        assert!(a.samples[entry..exit].iter().all(|p| *p == Presence::Occupied));
        assert_eq!(a.samples[exit], Presence::Vacant);
    }

    #[test]
    fn test_trailing_boundary_follows_last_status() {
        let logs = vec![
            log("home", &[("entered", "2019-03-01 08:00:20")]),
            log(
                "away",
                &[
                    ("entered", "2019-03-01 08:00:00"),
                    ("exited", "2019-03-01 08:00:10"),
                    ("entered", "2019-03-01 08:00:20"),
                    ("exited", "2019-03-01 08:00:30"),
                ],
            ),
            log("late", &[("exited", "2019-03-01 08:01:00")]),
        ];
        let signal = reconstruct_household(&logs, 10).unwrap();

        let home = bits(&signal.occupants[0]);
        assert_eq!(&home[..2], &[0, 0]);
        assert!(home[2..].iter().all(|b| *b == 1));

        // Zero from the final exit at 08:00:30 onward
        let away = bits(&signal.occupants[1]);
        assert_eq!(away, vec![1, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_first_event_exited_assumes_away() {
        let logs =
            vec![log("A", &[("exited", "2019-03-01 08:00:00"), ("exited", "2019-03-01 08:00:30")])];
        let signal = reconstruct_household(&logs, 10).unwrap();
        assert_eq!(signal.occupied, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_repeated_entered_leaves_no_gap() {
        let logs = vec![
            log("A", &[("entered", "2019-03-01 08:00:10"), ("entered", "2019-03-01 08:00:30")]),
            log("B", &[("exited", "2019-03-01 08:00:00")]),
        ];
        let signal = reconstruct_household(&logs, 10).unwrap();
        assert!(signal.occupants[0].is_resolved());
        assert_eq!(bits(&signal.occupants[0]), vec![0, 1, 1, 1]);
    }

    #[test]
    fn test_identical_timestamps_keep_file_order() {
        let logs = vec![log(
            "A",
            &[
                ("entered", "2019-03-01 08:00:00"),
                ("exited", "2019-03-01 08:00:20"),
                ("entered", "2019-03-01 08:00:20"),
                ("exited", "2019-03-01 08:00:40"),
            ],
        )];
        let signal = reconstruct_household(&logs, 10).unwrap();
        assert_eq!(bits(&signal.occupants[0]), vec![1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_occupant_without_events_is_vacant() {
        let logs = vec![
            log("A", &[("entered", "2019-03-01 08:00:00"), ("exited", "2019-03-01 08:00:20")]),
            OccupantLog::new("B", Vec::new()),
        ];
        let signal = reconstruct_household(&logs, 10).unwrap();
        assert_eq!(bits(&signal.occupants[1]), vec![0, 0, 0]);
        assert_eq!(signal.occupied, vec![1, 1, 0]);
    }

    #[test]
    fn test_all_empty_is_error() {
        let logs = vec![OccupantLog::new("A", Vec::new())];
        assert!(matches!(reconstruct_household(&logs, 10), Err(InputError::EmptyHousehold)));
    }

    #[test]
    fn test_event_span() {
        let logs = vec![
            log("A", &[("entered", "2019-03-01 09:00:00"), ("exited", "2019-03-01 08:00:00")]),
            log("B", &[("entered", "2019-03-01 08:30:00")]),
        ];
        let (lo, hi) = event_span(&logs).unwrap();
        assert_eq!(lo, ts("2019-03-01 08:00:00"));
        assert_eq!(hi, ts("2019-03-01 09:00:00"));
    }
}
