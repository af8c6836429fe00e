//! Calendar collaborator: day-of-week and month length.
//!
//! The tree validator and the day store only need these two answers, so they
//! take a `&dyn Calendar` instead of reading the clock or a date library
//! directly. [`Gregorian`] is the real implementation; tests can plug in a
//! fixed one.

use crate::error::{NutrackError, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week, Monday = 1 through Sunday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    /// The ordinal used in day file names.
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Weekday> {
        match n {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            7 => Some(Weekday::Sunday),
            _ => None,
        }
    }
}

pub trait Calendar {
    /// Whether dates in `year` can be answered at all. Callers check this
    /// before asking anything else about the year.
    fn supports_year(&self, _year: i32) -> bool {
        true
    }

    /// Only meaningful for a valid date in a supported year.
    fn day_of_week(&self, year: i32, month: u8, day: u8) -> Weekday;

    /// Number of days in `month` (1-12) of `year`, or 0 when the month or
    /// year is out of range.
    fn month_length(&self, month: u8, year: i32) -> u8;
}

/// The proleptic Gregorian calendar, backed by chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gregorian;

impl Calendar for Gregorian {
    /// Years chrono can represent in full.
    fn supports_year(&self, year: i32) -> bool {
        NaiveDate::from_ymd_opt(year, 1, 1).is_some()
            && NaiveDate::from_ymd_opt(year, 12, 31).is_some()
    }

    fn day_of_week(&self, year: i32, month: u8, day: u8) -> Weekday {
        NaiveDate::from_ymd_opt(year, month as u32, day as u32)
            .and_then(|d| Weekday::from_number(d.weekday().number_from_monday() as u8))
            // Unreachable for dates that passed `supports_year`.
            .unwrap_or(Weekday::Monday)
    }

    fn month_length(&self, month: u8, year: i32) -> u8 {
        if !(1..=12).contains(&month) {
            return 0;
        }
        let (next_year, next_month) = if month == 12 {
            (year.checked_add(1), 1)
        } else {
            (Some(year), month as u32 + 1)
        };
        next_year
            .and_then(|y| NaiveDate::from_ymd_opt(y, next_month, 1))
            .and_then(|first| first.pred_opt())
            .filter(|last| last.year() == year)
            .map(|last| last.day() as u8)
            .unwrap_or(0)
    }
}

/// A calendar date as the store partitions it: `<year>/<month>/<day>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    /// Builds a date, checking month and day against `calendar`.
    pub fn new(year: i32, month: u8, day: u8, calendar: &dyn Calendar) -> Result<Self> {
        if !calendar.supports_year(year) {
            return Err(NutrackError::InvalidDate(format!(
                "year {} is out of range",
                year
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(NutrackError::InvalidDate(format!(
                "month {} is out of range",
                month
            )));
        }
        let length = calendar.month_length(month, year);
        if day == 0 || day > length {
            return Err(NutrackError::InvalidDate(format!(
                "day {} is out of range for {}-{:02}",
                day, year, month
            )));
        }
        Ok(Self { year, month, day })
    }

    /// Today's date from the local clock.
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Self {
            year: now.year(),
            month: now.month() as u8,
            day: now.day() as u8,
        }
    }

    pub fn weekday(&self, calendar: &dyn Calendar) -> Weekday {
        calendar.day_of_week(self.year, self.month, self.day)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Parses `YYYY-MM-DD` against the Gregorian calendar.
impl FromStr for Date {
    type Err = NutrackError;

    fn from_str(s: &str) -> Result<Self> {
        let parsed = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| NutrackError::InvalidDate(format!("'{}': {}", s, e)))?;
        Date::new(
            parsed.year(),
            parsed.month() as u8,
            parsed.day() as u8,
            &Gregorian,
        )
    }
}
