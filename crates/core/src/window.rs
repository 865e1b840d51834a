//! Inclusive day-boundary helpers for date filtering.
//!
//! All report and settlement queries operate on inclusive calendar-day
//! windows: the start date is floored to 00:00:00.000 and the end date is
//! ceiled to 23:59:59.999 of the same calendar day.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

/// Errors from window construction.
#[derive(Debug, Error)]
pub enum WindowError {
    /// The start date is after the end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

/// An inclusive datetime window covering whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    /// Builds the window covering a single calendar day.
    #[must_use]
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: floor_of(date),
            end: ceil_of(date),
        }
    }

    /// Builds the window spanning `start` through `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::InvalidDateRange`] if `start` is after `end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::InvalidDateRange { start, end });
        }
        Ok(Self {
            start: floor_of(start),
            end: ceil_of(end),
        })
    }

    /// First instant of the window (00:00:00.000 on the start date).
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Last instant of the window (23:59:59.999 on the end date).
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

fn floor_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn ceil_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
        .and_utc()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_day_window_covers_whole_day() {
        let window = DateWindow::day(date(2024, 1, 10));

        assert_eq!(window.start().to_rfc3339(), "2024-01-10T00:00:00+00:00");
        assert_eq!(window.end().time().hour(), 23);
        assert_eq!(window.end().time().minute(), 59);
        assert_eq!(window.end().time().second(), 59);
        assert_eq!(window.end().timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_range_window_is_inclusive_on_both_ends() {
        let window = DateWindow::range(date(2024, 1, 1), date(2024, 1, 31)).expect("valid range");

        assert!(window.contains(floor_of(date(2024, 1, 1))));
        assert!(window.contains(ceil_of(date(2024, 1, 31))));
        assert!(!window.contains(floor_of(date(2024, 2, 1))));
        assert!(!window.contains(ceil_of(date(2023, 12, 31))));
    }

    #[test]
    fn test_single_day_range_equals_day_window() {
        let d = date(2024, 6, 15);
        assert_eq!(
            DateWindow::range(d, d).expect("valid range"),
            DateWindow::day(d)
        );
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = DateWindow::range(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, WindowError::InvalidDateRange { .. }));
    }
}
