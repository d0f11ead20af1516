//! Year-month dates as the resume editor sends them (`"2019-06"`).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{0}': expected YYYY-MM or YYYY-MM-DD")]
pub struct DateParseError(pub String);

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The current month in UTC.
    pub fn today() -> Self {
        let now = Utc::now().date_naive();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    /// Parses a date field that may legitimately be blank. Blank → `Ok(None)`.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, DateParseError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some)
    }

    /// Signed month difference `end - self`.
    pub fn months_until(self, end: YearMonth) -> i64 {
        i64::from(end.year - self.year) * 12 + (i64::from(end.month) - i64::from(self.month))
    }

    /// Steps back `months` calendar months.
    #[cfg(test)]
    pub fn minus_months(self, months: u32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 - i64::from(months);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl FromStr for YearMonth {
    type Err = DateParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || DateParseError(raw.to_string());
        let trimmed = raw.trim();
        // Full timestamps ("2019-06-01T00:00:00Z") keep only the date part.
        let date_part = trimmed.split('T').next().unwrap_or(trimmed);
        let parts: Vec<&str> = date_part.split('-').collect();

        let (year, month) = match parts.as_slice() {
            [y, m] | [y, m, _] if y.len() == 4 => (
                y.parse::<i32>().map_err(|_| err())?,
                m.parse::<u32>().map_err(|_| err())?,
            ),
            _ => return Err(err()),
        };

        if let [_, _, d] = parts.as_slice() {
            let day = d.parse::<u32>().map_err(|_| err())?;
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(err)?;
        }

        Self::new(year, month).ok_or_else(err)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
