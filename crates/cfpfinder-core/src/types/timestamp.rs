//! Instant type used for conference dates and CFP deadlines.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CfpError, CfpResult};

/// An absolute instant in whole seconds since the Unix epoch.
///
/// Calendar dates are mapped to their midnight, read as UTC, so a date
/// converted to a `Timestamp` and back is always the same date.
///
/// # Example
///
/// ```rust
/// use cfpfinder_core::types::Timestamp;
///
/// let ts = Timestamp::from_ymd(2026, 3, 15).unwrap();
/// assert_eq!(ts.format_ymd(), "2026-03-15");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wraps a raw seconds value.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Returns the raw seconds value.
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Midnight of `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN).and_utc().timestamp())
    }

    /// Midnight of the given calendar day.
    ///
    /// # Errors
    ///
    /// Returns `CfpError::InvalidDate` if the day does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CfpResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from_date)
            .ok_or_else(|| CfpError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses a `YYYY-MM-DD` string; surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CfpError::InvalidDate` if the string is not a valid date.
    pub fn parse_ymd(s: &str) -> CfpResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| CfpError::invalid_date(format!("Cannot parse '{s}', expected YYYY-MM-DD")))
    }

    /// The current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// Calendar date this instant falls on, if representable.
    #[must_use]
    pub fn date(self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.0, 0).map(|dt| dt.date_naive())
    }

    /// Formats as `YYYY-MM-DD`. Out-of-range values fall back to the raw seconds.
    #[must_use]
    pub fn format_ymd(self) -> String {
        match self.date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => self.0.to_string(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_ymd())
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}
