//! Fixed-frequency occupancy signals
//!
//! A `TimeIndex` is a regular grid of timestamps shared by every signal of a
//! household. Signals store one value per grid sample, aligned by position.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use super::error::InputError;
use super::types::{OccupantId, Presence};

/// Regular timestamp grid: `start, start + step, ...` with `len` samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeIndex {
    start: NaiveDateTime,
    step: TimeDelta,
    len: usize,
}

impl TimeIndex {
    /// Grid from `start` to `end` inclusive (end is kept only if it lands on the grid).
    /// An `end` before `start` yields an empty grid.
    pub fn spanning(
        start: NaiveDateTime,
        end: NaiveDateTime,
        step_secs: u32,
    ) -> Result<Self, InputError> {
        if step_secs == 0 {
            return Err(InputError::SampleInterval);
        }
        let step = TimeDelta::seconds(i64::from(step_secs));
        let span_ms = (end - start).num_milliseconds();
        let len = if span_ms < 0 { 0 } else { (span_ms / step.num_milliseconds()) as usize + 1 };
        Ok(Self { start, step, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn step_secs(&self) -> i64 {
        self.step.num_seconds()
    }

    /// Timestamp of sample `i`
    #[inline]
    pub fn timestamp(&self, i: usize) -> NaiveDateTime {
        self.start + TimeDelta::seconds(self.step.num_seconds() * i as i64)
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.len).map(move |i| self.timestamp(i))
    }

    /// Number of samples with timestamp strictly before `t`
    pub fn count_before(&self, t: NaiveDateTime) -> usize {
        let offset_ms = (t - self.start).num_milliseconds();
        if offset_ms <= 0 {
            return 0;
        }
        let step_ms = self.step.num_milliseconds();
        let n = (offset_ms + step_ms - 1) / step_ms;
        (n as usize).min(self.len)
    }

    /// Sample positions falling on calendar day `date`
    pub fn day_range(&self, date: NaiveDate) -> std::ops::Range<usize> {
        let day_start = date.and_time(chrono::NaiveTime::MIN);
        let next_start = day_start + TimeDelta::days(1);
        self.count_before(day_start)..self.count_before(next_start)
    }
}

/// Reconstructed presence of a single occupant over the household grid
#[derive(Debug, Clone)]
pub struct OccupantTimeline {
    pub occupant: OccupantId,
    pub samples: Vec<Presence>,
}

impl OccupantTimeline {
    /// True once no sample is left unresolved
    pub fn is_resolved(&self) -> bool {
        self.samples.iter().all(|p| *p != Presence::Unknown)
    }

    pub fn bits(&self) -> impl Iterator<Item = u8> + '_ {
        self.samples.iter().map(|p| p.as_bit().unwrap_or(0))
    }
}

/// Household-level signal before buffering
#[derive(Debug, Clone)]
pub struct HouseholdSignal {
    pub index: TimeIndex,
    pub occupants: Vec<OccupantTimeline>,
    /// 1 if any occupant is present
    pub occupied: Vec<u8>,
    /// Number of occupants present
    pub number: Vec<u8>,
}

/// Household signal after gap buffering
#[derive(Debug, Clone)]
pub struct BufferedSignal {
    pub index: TimeIndex,
    pub occupied: Vec<u8>,
    pub number: Vec<u8>,
}

/// One row of a buffered signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalRow {
    pub timestamp: NaiveDateTime,
    pub occupied: u8,
    pub number: u8,
}

/// Buffered signal restricted to one calendar day
#[derive(Debug, Clone)]
pub struct DailySlice {
    pub date: NaiveDate,
    pub rows: Vec<SignalRow>,
}

impl DailySlice {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn occupied_samples(&self) -> usize {
        self.rows.iter().filter(|r| r.occupied == 1).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_spanning_inclusive() {
        let idx = TimeIndex::spanning(ts("2019-03-01 08:00:00"), ts("2019-03-01 08:00:40"), 10)
            .unwrap();
        assert_eq!(idx.len(), 5);
        assert_eq!(idx.timestamp(4), ts("2019-03-01 08:00:40"));
    }

    #[test]
    fn test_timestamp_beyond_i32_offsets() {
        let idx = TimeIndex::spanning(ts("2019-03-01 08:00:00"), ts("2019-03-01 08:00:40"), 10)
            .unwrap();
        let i = i32::MAX as usize + 10;
        let expected = ts("2019-03-01 08:00:00") + TimeDelta::seconds(10 * i as i64);
        assert_eq!(idx.timestamp(i), expected);
        assert!(idx.timestamp(i) > idx.timestamp(4));
    }

    #[test]
    fn test_spanning_off_grid_end() {
        let idx = TimeIndex::spanning(ts("2019-03-01 08:00:00"), ts("2019-03-01 08:00:45"), 10)
            .unwrap();
        assert_eq!(idx.len(), 5);
    }

    #[test]
    fn test_spanning_reversed_is_empty() {
        let idx = TimeIndex::spanning(ts("2019-03-01 09:00:00"), ts("2019-03-01 08:00:00"), 10)
            .unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = TimeIndex::spanning(ts("2019-03-01 08:00:00"), ts("2019-03-01 08:00:40"), 0);
        assert!(matches!(err, Err(InputError::SampleInterval)));
    }

    #[test]
    fn test_count_before() {
        let idx = TimeIndex::spanning(ts("2019-03-01 08:00:00"), ts("2019-03-01 08:00:40"), 10)
            .unwrap();
        assert_eq!(idx.count_before(ts("2019-03-01 08:00:00")), 0);
        assert_eq!(idx.count_before(ts("2019-03-01 08:00:20")), 2);
        assert_eq!(idx.count_before(ts("2019-03-01 08:00:25")), 3);
        assert_eq!(idx.count_before(ts("2019-03-01 07:00:00")), 0);
        assert_eq!(idx.count_before(ts("2019-03-01 09:00:00")), 5);
    }

    #[test]
    fn test_day_range() {
        let idx = TimeIndex::spanning(ts("2019-03-01 23:59:40"), ts("2019-03-02 00:00:20"), 10)
            .unwrap();
        let d1 = NaiveDate::from_ymd_opt(2019, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2019, 3, 2).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2019, 3, 3).unwrap();
        assert_eq!(idx.day_range(d1), 0..2);
        assert_eq!(idx.day_range(d2), 2..5);
        assert!(idx.day_range(d3).is_empty());
    }
}
