//! Narrow calendar contract: what "today" is, plus the pure date helpers
//! every caller shares.

use std::cell::Cell;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the device-local date and wall-clock time.
pub trait Calendar {
    fn today(&self) -> NaiveDate;
    /// Unix milliseconds.
    fn now_millis(&self) -> i64;
}

/// Reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Local::now().timestamp_millis()
    }
}

/// Calendar pinned to a chosen instant. Tests move it with [`FixedCalendar::set`].
#[derive(Debug, Clone)]
pub struct FixedCalendar {
    today: Cell<NaiveDate>,
    now_millis: Cell<i64>,
}

impl FixedCalendar {
    /// Pin to noon UTC of `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Cell::new(today),
            now_millis: Cell::new(noon_millis(today)),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        self.today.set(today);
        self.now_millis.set(noon_millis(today));
    }
}

impl Calendar for FixedCalendar {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_millis(&self) -> i64 {
        self.now_millis.get()
    }
}

fn noon_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(12, 0, 0)
        .map_or(0, |dt| dt.and_utc().timestamp_millis())
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .with_context(|| format!("Invalid date '{s}'. Must be YYYY-MM-DD"))
}

/// `date` moved by `days`, negative for the past.
#[must_use]
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Most recent Sunday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_week_start_is_previous_sunday() {
        // 2026-10-14 is a Wednesday
        assert_eq!(week_start(date("2026-10-14")), date("2026-10-11"));
        assert_eq!(week_start(date("2026-10-17")), date("2026-10-11"));
    }

    #[test]
    fn test_week_start_on_sunday_is_same_day() {
        assert_eq!(week_start(date("2026-10-11")), date("2026-10-11"));
    }

    #[test]
    fn test_week_start_crosses_month() {
        // 2026-10-01 is a Thursday
        assert_eq!(week_start(date("2026-10-01")), date("2026-09-27"));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date("2026-10-14")), date("2026-10-01"));
        assert_eq!(month_start(date("2026-10-01")), date("2026-10-01"));
    }

    #[test]
    fn test_shift_days_crosses_boundaries() {
        assert_eq!(shift_days(date("2026-10-01"), -1), date("2026-09-30"));
        assert_eq!(shift_days(date("2026-12-31"), 1), date("2027-01-01"));
        assert_eq!(shift_days(date("2026-10-14"), 0), date("2026-10-14"));
    }

    #[test]
    fn test_format_and_parse() {
        let d = date("2026-03-07");
        assert_eq!(format_date(d), "2026-03-07");
        assert!(parse_date("2026-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_fixed_calendar_moves() {
        let calendar = FixedCalendar::new(date("2026-10-14"));
        let before = calendar.now_millis();
        calendar.set(date("2026-10-15"));
        assert_eq!(calendar.today(), date("2026-10-15"));
        assert_eq!(calendar.now_millis() - before, 24 * 60 * 60 * 1000);
    }
}
