//! Date bounds configured on a view.
//!
//! A bound is either an absolute date (`2025-04-01`) or a date relative to the
//! day the request is compiled (`today`, `-1 week`, `+3 months`). Relative
//! bounds are resolved against an explicit `today` so compilation stays a pure
//! function of its inputs.

use std::fmt;
use std::str::FromStr;

use entryview_core::{CoreError, DateBounds, format_search_date, parse_search_date};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

/// Unit of a relative date bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl RelativeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "days" => Some(Self::Days),
            "week" | "weeks" => Some(Self::Weeks),
            "month" | "months" => Some(Self::Months),
            "year" | "years" => Some(Self::Years),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

/// One side of a view's date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateBound {
    Absolute(Date),
    Relative { amount: i64, unit: RelativeUnit },
}

impl DateBound {
    /// Resolve to a calendar date. Returns `None` when the arithmetic leaves the
    /// supported date range.
    pub fn resolve(&self, today: Date) -> Option<Date> {
        match *self {
            Self::Absolute(date) => Some(date),
            Self::Relative { amount, unit } => match unit {
                RelativeUnit::Days => today.checked_add(Duration::days(amount)),
                RelativeUnit::Weeks => today.checked_add(Duration::weeks(amount)),
                RelativeUnit::Months => add_months(today, amount),
                RelativeUnit::Years => add_months(today, amount.checked_mul(12)?),
            },
        }
    }
}

/// Shift by whole months, clamping the day to the target month's length.
fn add_months(date: Date, months: i64) -> Option<Date> {
    let index = i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1;
    let shifted = index.checked_add(months)?;
    let year = i32::try_from(shifted.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(shifted.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).ok()
}

impl FromStr for DateBound {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "today" | "now" => {
                return Ok(Self::Relative {
                    amount: 0,
                    unit: RelativeUnit::Days,
                });
            }
            "yesterday" => {
                return Ok(Self::Relative {
                    amount: -1,
                    unit: RelativeUnit::Days,
                });
            }
            "tomorrow" => {
                return Ok(Self::Relative {
                    amount: 1,
                    unit: RelativeUnit::Days,
                });
            }
            _ => {}
        }

        if let Ok(date) = parse_search_date(trimmed) {
            return Ok(Self::Absolute(date));
        }

        let mut parts = trimmed.split_whitespace();
        if let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next())
            && let Ok(amount) = amount.trim_start_matches('+').parse::<i64>()
            && let Some(unit) = RelativeUnit::parse(unit)
        {
            return Ok(Self::Relative { amount, unit });
        }

        Err(CoreError::invalid_bound(s))
    }
}

impl TryFrom<String> for DateBound {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(date) => f.write_str(&format_search_date(*date)),
            Self::Relative { amount: 0, unit: RelativeUnit::Days } => f.write_str("today"),
            Self::Relative { amount, unit } => write!(f, "{amount:+} {}", unit.as_str()),
        }
    }
}

impl From<DateBound> for String {
    fn from(bound: DateBound) -> Self {
        bound.to_string()
    }
}

/// The configured `start_date`/`end_date` pair of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateBound>,
}

impl BoundsConfig {
    pub fn is_configured(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Resolve both sides against `today`.
    pub fn resolve(&self, today: Date) -> DateBounds {
        let start = self.start_date.and_then(|b| b.resolve(today));
        let end = self.end_date.and_then(|b| b.resolve(today));
        if self.is_configured() {
            tracing::debug!(start = ?start, end = ?end, "Resolved view date bounds");
        }
        DateBounds::new(start, end)
    }
}
