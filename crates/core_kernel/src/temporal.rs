//! Business-calendar temporal types
//!
//! Orders and rate observations are timestamped in UTC, but the business
//! reconciles on local calendar days: "today's rate" and "September's income"
//! both mean Caracas days, not UTC days. This module provides the timezone
//! wrapper and day-range types that make that conversion explicit.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper for the business's local calendar
///
/// Wraps `chrono_tz::Tz` with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Returns the local calendar date of a UTC instant
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        self.to_local(utc).date_naive()
    }

    /// Gets the start of day (00:00:00) in this timezone as UTC
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(0, 0, 0)
            .unwrap()
            .and_local_timezone(self.0)
            .single()
            .expect("Invalid timezone conversion")
            .with_timezone(&Utc)
    }

    /// Gets the end of day (23:59:59.999999999) in this timezone as UTC
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap()
            .and_local_timezone(self.0)
            .single()
            .expect("Invalid timezone conversion")
            .with_timezone(&Utc)
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::America::Caracas)
    }
}

impl FromStr for Timezone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| format!("'{}' is not a valid timezone", s))
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod { start: String, end: String },
}

/// An inclusive range of business-local calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// A range covering a single day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Converts to the UTC instant window covering these local days
    pub fn to_utc_window(&self, tz: &Timezone) -> UtcWindow {
        UtcWindow {
            start: tz.start_of_day(self.start),
            end: tz.end_of_day(self.end),
        }
    }
}

/// An inclusive window of UTC instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl UtcWindow {
    /// Returns true if this window contains the given instant
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_range_rejects_inverted() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();

        assert!(matches!(
            DateRange::new(start, end),
            Err(TemporalError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
        )
        .unwrap();

        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()));
        assert_eq!(range.days(), 30);
    }

    #[test]
    fn test_caracas_day_boundaries() {
        let tz = Timezone::default();
        let day = NaiveDate::from_ymd_opt(2025, 9, 24).unwrap();
        let window = DateRange::single_day(day).to_utc_window(&tz);

        // Caracas is UTC-4 year round, so the local day starts at 04:00 UTC.
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 9, 24, 4, 0, 0).unwrap());
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 9, 25, 3, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2025, 9, 25, 4, 0, 0).unwrap()));
    }

    #[test]
    fn test_local_date_crosses_utc_midnight() {
        let tz = Timezone::default();
        // 01:30 UTC on the 25th is still 21:30 on the 24th in Caracas.
        let instant = Utc.with_ymd_and_hms(2025, 9, 25, 1, 30, 0).unwrap();

        assert_eq!(
            tz.local_date(instant),
            NaiveDate::from_ymd_opt(2025, 9, 24).unwrap()
        );
    }

    #[test]
    fn test_timezone_parsing() {
        let tz: Timezone = "America/Caracas".parse().unwrap();
        assert_eq!(tz, Timezone::default());
        assert!("Not/AZone".parse::<Timezone>().is_err());
    }
}
