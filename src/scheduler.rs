//! Once-a-day snapshot trigger.
//!
//! The monitor loop calls [`DailySnapshotScheduler::due`] on every check
//! tick with the current local time. It answers `true` at most once per
//! local calendar date, and only during the 00:00 minute.
//!
//! # Clock injection
//! `now` is always passed in, so tests can walk through midnight without
//! touching the system clock.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};

#[derive(Debug, Clone, Default)]
pub struct DailySnapshotScheduler {
    last_fired: Option<NaiveDate>,
}

impl DailySnapshotScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Date of the last snapshot this scheduler released, if any.
    pub fn last_fired(&self) -> Option<NaiveDate> {
        self.last_fired
    }

    /// Returns `true` if a snapshot should be taken now, and records it.
    pub fn due(&mut self, now: DateTime<FixedOffset>) -> bool {
        // ---
        if now.hour() != 0 || now.minute() != 0 {
            return false;
        }

        let today = now.date_naive();
        if self.last_fired == Some(today) {
            return false;
        }

        self.last_fired = Some(today);
        true
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{Duration, TimeZone};

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn at(day: u32, h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        manila().with_ymd_and_hms(2026, 10, day, h, m, s).unwrap()
    }

    #[test]
    fn test_fires_only_in_midnight_minute() {
        // ---
        let mut scheduler = DailySnapshotScheduler::new();
        assert!(!scheduler.due(at(15, 23, 59, 59)));
        assert!(!scheduler.due(at(16, 0, 1, 0)));
        assert!(!scheduler.due(at(16, 12, 0, 0)));
        assert!(scheduler.last_fired().is_none());
    }

    #[test]
    fn test_fires_once_per_day_with_minute_ticks() {
        // ---
        let mut scheduler = DailySnapshotScheduler::new();
        let start = at(15, 23, 58, 30);

        // Two days of one-minute ticks.
        let fired: Vec<_> = (0..(2 * 24 * 60))
            .map(|i| start + Duration::minutes(i))
            .filter(|now| scheduler.due(*now))
            .collect();

        assert_eq!(fired, vec![at(16, 0, 0, 30), at(17, 0, 0, 30)]);
    }

    #[test]
    fn test_no_double_fire_within_the_minute() {
        // ---
        let mut scheduler = DailySnapshotScheduler::new();
        assert!(scheduler.due(at(16, 0, 0, 1)));
        assert!(!scheduler.due(at(16, 0, 0, 30)));
        assert!(!scheduler.due(at(16, 0, 0, 59)));
        assert_eq!(
            scheduler.last_fired(),
            NaiveDate::from_ymd_opt(2026, 10, 16)
        );
    }

    #[test]
    fn test_local_midnight_not_utc_midnight() {
        // ---
        let mut scheduler = DailySnapshotScheduler::new();
        let utc_midnight = chrono::Utc
            .with_ymd_and_hms(2026, 10, 16, 0, 0, 0)
            .unwrap()
            .with_timezone(&manila());
        assert!(!scheduler.due(utc_midnight), "08:00 local is not midnight");

        let local_midnight = chrono::Utc
            .with_ymd_and_hms(2026, 10, 15, 16, 0, 0)
            .unwrap()
            .with_timezone(&manila());
        assert!(scheduler.due(local_midnight));
    }
}
