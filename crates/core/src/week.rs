//! Academic week numbering.
//!
//! Weekly activity logs are keyed by `(week_number, academic_year)`. Weeks
//! follow ISO-8601: weeks start on Monday, week 1 is the week containing the
//! first Thursday of the year, and the academic year is the ISO week-based
//! year (so 2024-12-30 belongs to week 1 of `"2025"`).
//!
//! Activity logs only accept weeks `1..=52`; an ISO week 53 has no valid
//! [`AcademicWeek`].

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Highest week number an activity log may carry.
pub const MAX_WEEK: u32 = 52;

// ---------------------------------------------------------------------------
// WeekNumber
// ---------------------------------------------------------------------------

/// A week number in `1..=52`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WeekNumber(u32);

impl WeekNumber {
    pub fn new(week: u32) -> Result<Self, CoreError> {
        if (1..=MAX_WEEK).contains(&week) {
            Ok(Self(week))
        } else {
            Err(CoreError::InvalidWeek(week.into()))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Database columns store weeks as `INTEGER`.
impl TryFrom<i32> for WeekNumber {
    type Error = CoreError;

    fn try_from(week: i32) -> Result<Self, Self::Error> {
        u32::try_from(week)
            .map_err(|_| CoreError::InvalidWeek(week.into()))
            .and_then(Self::new)
    }
}

impl TryFrom<u32> for WeekNumber {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekNumber> for u32 {
    fn from(week: WeekNumber) -> Self {
        week.0
    }
}

impl fmt::Display for WeekNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AcademicYear
// ---------------------------------------------------------------------------

/// A four-digit year string such as `"2024"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear(String);

impl AcademicYear {
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidAcademicYear(value))
        }
    }

    /// Build from a numeric calendar year.
    pub fn from_year(year: i32) -> Result<Self, CoreError> {
        Self::new(year.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AcademicYear> for String {
    fn from(year: AcademicYear) -> Self {
        year.0
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// AcademicWeek
// ---------------------------------------------------------------------------

/// The `(week, year)` key an activity log is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AcademicWeek {
    pub week: WeekNumber,
    pub year: AcademicYear,
}

impl AcademicWeek {
    pub fn new(week: WeekNumber, year: AcademicYear) -> Self {
        Self { week, year }
    }

    /// The ISO-8601 week containing `date`.
    ///
    /// Returns [`CoreError::InvalidWeek`] when `date` falls in ISO week 53.
    pub fn containing(date: NaiveDate) -> Result<Self, CoreError> {
        let iso = date.iso_week();
        Ok(Self {
            week: WeekNumber::new(iso.week())?,
            year: AcademicYear::from_year(iso.year())?,
        })
    }
}

impl fmt::Display for AcademicWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {} of {}", self.week, self.year)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
