//! Calendar months and closed month ranges for the historical archive.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("invalid month {month} for year {year} (expected 1..=12)")]
    InvalidMonth { year: i32, month: u32 },

    #[error("invalid period '{0}' (expected YYYY-MM)")]
    Malformed(String),
}

/// A validated calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month, wrapping December into January of the next year.
    /// `None` past December of `i32::MAX`.
    pub fn checked_next(&self) -> Option<Self> {
        if self.month == 12 {
            Some(Self {
                year: self.year.checked_add(1)?,
                month: 1,
            })
        } else {
            Some(Self {
                year: self.year,
                month: self.month + 1,
            })
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| PeriodError::Malformed(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = PeriodError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> String {
        ym.to_string()
    }
}

/// Closed range of months, `start..=end`.
///
/// A range whose start is after its end is valid and empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl MonthRange {
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self { start, end }
    }

    pub fn single(month: YearMonth) -> Self {
        Self {
            start: month,
            end: month,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of months in the range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let months = |ym: &YearMonth| i64::from(ym.year) * 12 + i64::from(ym.month) - 1;
        (months(&self.end) - months(&self.start) + 1) as usize
    }

    pub fn iter(&self) -> MonthIter {
        MonthIter {
            next: Some(self.start).filter(|_| !self.is_empty()),
            end: self.end,
        }
    }
}

impl IntoIterator for MonthRange {
    type Item = YearMonth;
    type IntoIter = MonthIter;

    fn into_iter(self) -> MonthIter {
        self.iter()
    }
}

/// Iterator over the months of a [`MonthRange`], in chronological order.
#[derive(Debug, Clone)]
pub struct MonthIter {
    next: Option<YearMonth>,
    end: YearMonth,
}

impl Iterator for MonthIter {
    type Item = YearMonth;

    fn next(&mut self) -> Option<YearMonth> {
        let current = self.next?;
        self.next = if current < self.end {
            current.checked_next()
        } else {
            None
        };
        Some(current)
    }
}
