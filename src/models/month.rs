//! Month grouping key
//!
//! Every transaction belongs to exactly one calendar month. The key renders
//! as "March 2024" and is what budgets and summaries are indexed by.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month and year
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a key, validating the month number (1-12)
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) {
            return Err(MonthParseError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The month a date falls in; the day is ignored
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month in local time
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Full English month name
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    /// Parse a key
    ///
    /// Formats:
    /// - "March 2024", "march 2024", "Mar 2024"
    /// - "2024-03"
    pub fn parse(s: &str) -> Result<Self, MonthParseError> {
        let s = s.trim();
        let invalid = || MonthParseError::InvalidFormat(s.to_string());

        if let Some((name, year)) = s.split_once(char::is_whitespace) {
            let month = month_from_name(name.trim()).ok_or_else(invalid)?;
            let year = year.trim();
            if year.len() != 4 {
                return Err(invalid());
            }
            let year: i32 = year.parse().map_err(|_| invalid())?;
            return Self::new(year, month);
        }

        if let Some((year, month)) = s.split_once('-') {
            let year: i32 = year.parse().map_err(|_| invalid())?;
            let month: u32 = month.parse().map_err(|_| invalid())?;
            return Self::new(year, month);
        }

        Err(invalid())
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|full| {
            let full = full.to_lowercase();
            full == lower || (lower.len() == 3 && full.starts_with(&lower))
        })
        .map(|idx| idx as u32 + 1)
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{} {:04}", self.month_name(), self.year))
    }
}

impl FromStr for MonthKey {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error type for month parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthParseError {
    #[error("Invalid month format: {0}")]
    InvalidFormat(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),
}
