//! Calendar helpers and enums shared by budget entries.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often an entry repeats after its first date.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Repeat {
    pub const ALL: [Repeat; 5] = [
        Repeat::Once,
        Repeat::Daily,
        Repeat::Weekly,
        Repeat::Monthly,
        Repeat::Yearly,
    ];

    /// Lists every repeat option paired with its form label.
    pub fn options() -> Vec<(Repeat, &'static str)> {
        Self::ALL.iter().map(|repeat| (*repeat, repeat.label())).collect()
    }

    pub fn key(self) -> &'static str {
        match self {
            Repeat::Once => "once",
            Repeat::Daily => "daily",
            Repeat::Weekly => "weekly",
            Repeat::Monthly => "monthly",
            Repeat::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Repeat::Once => "Does not repeat",
            Repeat::Daily => "Daily",
            Repeat::Weekly => "Weekly",
            Repeat::Monthly => "Monthly",
            Repeat::Yearly => "Yearly",
        }
    }

    pub fn is_once(self) -> bool {
        matches!(self, Repeat::Once)
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Repeat {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "once" | "none" => Ok(Repeat::Once),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            "yearly" => Ok(Repeat::Yearly),
            other => Err(ParseEnumError::new("repeat", other)),
        }
    }
}

/// Error returned when a textual enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Half-open reporting window `[from, to)` used by the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateRangeError> {
        if to <= from {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { from, to })
    }

    /// Covers the whole calendar year `year`.
    pub fn year(year: i32) -> Result<Self, DateRangeError> {
        let from = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(DateRangeError::OutOfBounds)?;
        let to = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or(DateRangeError::OutOfBounds)?;
        Self::new(from, to)
    }

    /// Range covering the calendar year that contains `date`.
    pub fn year_containing(date: NaiveDate) -> Result<Self, DateRangeError> {
        Self::year(date.year())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date < self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateRange`] values.
pub enum DateRangeError {
    InvalidRange,
    OutOfBounds,
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRangeError::InvalidRange => f.write_str("range end must be after start"),
            DateRangeError::OutOfBounds => f.write_str("range is outside the supported calendar"),
        }
    }
}

impl std::error::Error for DateRangeError {}

/// Returns the first day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Moves `date` by `months`, clamping the day to the target month length.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Moves `date` by `years`, clamping Feb 29 to Feb 28 in common years.
pub fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    shift_month(date, years.checked_mul(12)?)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// Number of days from the start of `date`'s month to the start of the next one.
pub fn month_width_days(date: NaiveDate) -> i64 {
    days_in_month(date.year(), date.month())
        .map(i64::from)
        .unwrap_or(30)
}
