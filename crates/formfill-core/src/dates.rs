//! Calendar helpers shared by the date validators
//!
//! "Today" is always read through a [`Clock`] so that relative limits
//! (`yesterday`, `today`, `tomorrow`) can be pinned in tests.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::fmt;

use crate::types::DateLimit;

/// Source of the current calendar day
pub trait Clock: Send + Sync + fmt::Debug {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDate);

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self(today)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parse a submitted date string down to its calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps. Any time component is discarded.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|timestamp| timestamp.date())
}

/// Turn a limit into a concrete day, `None` meaning unbounded
pub fn resolve_date_limit(limit: &DateLimit, clock: &dyn Clock) -> Option<NaiveDate> {
    match limit {
        DateLimit::None => None,
        DateLimit::Yesterday => clock.today().pred_opt(),
        DateLimit::Today => Some(clock.today()),
        DateLimit::Tomorrow => clock.today().succ_opt(),
        DateLimit::On(date) => Some(*date),
    }
}

/// Whole days from `start` to `end`; negative when `end` comes first
pub fn calculate_gap(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Human-readable day, e.g. `Thu Sep 11 2025`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_calendar_date_formats() {
        assert_eq!(parse_calendar_date("2025-01-10"), Some(day(2025, 1, 10)));
        assert_eq!(
            parse_calendar_date("2025-01-10T23:15:00+05:30"),
            Some(day(2025, 1, 10))
        );
        assert_eq!(
            parse_calendar_date("2025-01-10T15:30:00"),
            Some(day(2025, 1, 10))
        );
        assert_eq!(parse_calendar_date("10/01/2025"), None);
        assert_eq!(parse_calendar_date("2025-02-30"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn test_resolve_relative_limits() {
        let clock = FixedClock::new(day(2025, 3, 1));

        assert_eq!(resolve_date_limit(&DateLimit::None, &clock), None);
        assert_eq!(
            resolve_date_limit(&DateLimit::Yesterday, &clock),
            Some(day(2025, 2, 28))
        );
        assert_eq!(
            resolve_date_limit(&DateLimit::Today, &clock),
            Some(day(2025, 3, 1))
        );
        assert_eq!(
            resolve_date_limit(&DateLimit::Tomorrow, &clock),
            Some(day(2025, 3, 2))
        );
        assert_eq!(
            resolve_date_limit(&DateLimit::On(day(2030, 1, 1)), &clock),
            Some(day(2030, 1, 1))
        );
    }

    #[test]
    fn test_calculate_gap() {
        assert_eq!(calculate_gap(day(2025, 1, 1), day(2025, 1, 6)), 5);
        assert_eq!(calculate_gap(day(2025, 1, 6), day(2025, 1, 6)), 0);
        assert_eq!(calculate_gap(day(2025, 1, 6), day(2025, 1, 1)), -5);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(day(2025, 9, 11)), "Thu Sep 11 2025");
    }
}
