//! Daily extraction of the buffered signal
//!
//! A `HomeSchedule` maps each home to the inclusive date ranges that belong to
//! the published dataset. Every date in those ranges becomes one output slice.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

use crate::domain::signal::{BufferedSignal, DailySlice, SignalRow};
use crate::domain::types::HomeId;
use crate::domain::InputError;

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Parse a `[start, end]` pair of ISO dates; surrounding whitespace is ignored
    pub fn parse(start: &str, end: &str) -> Result<Self, InputError> {
        let invalid = |reason: String| InputError::DateRange {
            start: start.to_string(),
            end: end.to_string(),
            reason,
        };
        let s = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d")
            .map_err(|e| invalid(e.to_string()))?;
        let e = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d")
            .map_err(|e| invalid(e.to_string()))?;
        if e < s {
            return Err(invalid("end precedes start".to_string()));
        }
        Ok(Self { start: s, end: e })
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while({
            let end = self.end;
            move |d| *d <= end
        })
    }
}

/// Per-home date ranges used to pick the days that get an output file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeSchedule {
    homes: BTreeMap<String, Vec<DateRange>>,
}

impl HomeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw `home -> [[start, end], ...]` string pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = (&'a str, &'a [[String; 2]])>,
    {
        let mut schedule = Self::new();
        for (home, ranges) in pairs {
            let parsed = ranges
                .iter()
                .map(|[start, end]| DateRange::parse(start, end))
                .collect::<Result<Vec<_>, _>>()?;
            schedule.homes.insert(home.to_string(), parsed);
        }
        Ok(schedule)
    }

    pub fn insert(&mut self, home: impl Into<String>, ranges: Vec<DateRange>) {
        self.homes.insert(home.into(), ranges);
    }

    pub fn homes(&self) -> impl Iterator<Item = &str> {
        self.homes.keys().map(String::as_str)
    }

    pub fn ranges(&self, home: &HomeId) -> Option<&[DateRange]> {
        self.homes.get(home.as_str()).map(Vec::as_slice)
    }

    /// All configured days for a home, in configured order
    pub fn days(&self, home: &HomeId) -> Result<Vec<NaiveDate>, InputError> {
        let ranges = self.ranges(home).ok_or_else(|| InputError::UnknownHome(home.to_string()))?;
        Ok(ranges.iter().flat_map(DateRange::days).collect())
    }
}

/// Buffered signal restricted to `date`
pub fn slice_day(signal: &BufferedSignal, date: NaiveDate) -> DailySlice {
    let rows = signal
        .index
        .day_range(date)
        .map(|i| SignalRow {
            timestamp: signal.index.timestamp(i),
            occupied: signal.occupied[i],
            number: signal.number[i],
        })
        .collect();
    DailySlice { date, rows }
}

/// One slice per listed day; days outside the signal yield empty slices
pub fn extract_days(signal: &BufferedSignal, days: &[NaiveDate]) -> Vec<DailySlice> {
    days.iter()
        .map(|&date| {
            let slice = slice_day(signal, date);
            if slice.is_empty() {
                warn!(date = %date, "day_outside_signal_range");
            }
            slice
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::TimeIndex;
    use chrono::NaiveDateTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::parse("2019-01-01", "2019-01-02").unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days, vec![date("2019-01-01"), date("2019-01-02")]);
    }

    #[test]
    fn test_range_tolerates_whitespace() {
        let range = DateRange::parse("2019-11-26", " 2019-12-25").unwrap();
        assert_eq!(range.days().count(), 30);
    }

    #[test]
    fn test_range_rejects_reversed_and_garbage() {
        assert!(matches!(
            DateRange::parse("2019-01-03", "2019-01-01"),
            Err(InputError::DateRange { .. })
        ));
        assert!(DateRange::parse("yesterday", "2019-01-01").is_err());
    }

    #[test]
    fn test_schedule_days_for_home() {
        let ranges = vec![["2019-01-01".to_string(), "2019-01-02".to_string()]];
        let schedule = HomeSchedule::from_pairs([("H1", ranges.as_slice())]).unwrap();
        let days = schedule.days(&HomeId("H1".to_string())).unwrap();
        assert_eq!(days, vec![date("2019-01-01"), date("2019-01-02")]);
    }

    #[test]
    fn test_schedule_unknown_home() {
        let schedule = HomeSchedule::new();
        assert!(matches!(
            schedule.days(&HomeId("H9".to_string())),
            Err(InputError::UnknownHome(_))
        ));
    }

    #[test]
    fn test_multiple_ranges_in_order() {
        let mut schedule = HomeSchedule::new();
        schedule.insert(
            "H3",
            vec![
                DateRange::parse("2019-07-23", "2019-07-24").unwrap(),
                DateRange::parse("2019-08-15", "2019-08-15").unwrap(),
            ],
        );
        let days = schedule.days(&HomeId("H3".to_string())).unwrap();
        assert_eq!(days, vec![date("2019-07-23"), date("2019-07-24"), date("2019-08-15")]);
    }

    #[test]
    fn test_extract_days_slices_signal() {
        let index = TimeIndex::spanning(ts("2019-01-01 23:59:30"), ts("2019-01-02 00:00:20"), 10)
            .unwrap();
        let signal = BufferedSignal {
            index,
            occupied: vec![1, 1, 1, 0, 0, 1],
            number: vec![2, 1, 1, 0, 0, 1],
        };
        let slices = extract_days(&signal, &[date("2019-01-01"), date("2019-01-02")]);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].rows.len(), 3);
        assert_eq!(slices[1].rows.len(), 3);
        assert_eq!(slices[1].rows[0].timestamp, ts("2019-01-02 00:00:00"));
        assert_eq!(slices[1].occupied_samples(), 1);
    }

    #[test]
    fn test_day_outside_signal_is_empty() {
        let index = TimeIndex::spanning(ts("2019-01-01 08:00:00"), ts("2019-01-01 08:00:20"), 10)
            .unwrap();
        let signal = BufferedSignal { index, occupied: vec![1, 1, 1], number: vec![1, 1, 1] };
        let slices = extract_days(&signal, &[date("2019-02-01")]);
        assert!(slices[0].is_empty());
    }
}
