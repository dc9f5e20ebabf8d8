//! Search date parsing and date bounds.
//!
//! Request dates arrive in whatever layout the search form's date picker used.
//! They are normalized to `YYYY-MM-DD` before they reach the filter criteria.
//!
//! Accepted layouts:
//! - `2025-04-01` (ISO, also the prefix of an ISO datetime)
//! - `2025/04/01`
//! - `04/01/2025` and `4/1/2025` (month first)
//! - `04-01-2025`
//! - `01.04.2025` (day first)

use crate::error::{CoreError, Result};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const INPUT_LAYOUTS: &[&[BorrowedFormatItem<'static>]] = &[
    ISO_DATE,
    format_description!("[year]/[month]/[day]"),
    format_description!("[month]/[day]/[year]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
    format_description!("[month]-[day]-[year]"),
    format_description!("[day].[month].[year]"),
];

/// Parse a request date in any accepted layout.
pub fn parse_search_date(raw: &str) -> Result<Date> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid_date(raw));
    }

    // Datetime values keep only their calendar date
    let candidate = match trimmed.split_once('T') {
        Some((date, _)) if date.len() == 10 => date,
        _ => trimmed,
    };

    INPUT_LAYOUTS
        .iter()
        .find_map(|layout| Date::parse(candidate, *layout).ok())
        .ok_or_else(|| CoreError::invalid_date(raw))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_search_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_else(|_| {
        format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        )
    })
}

/// A record collection's effective date range.
///
/// Bounds clip requested date filters: a requested date outside the range is
/// dropped, never moved onto the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl DateBounds {
    pub fn new(start_date: Option<Date>, end_date: Option<Date>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Bounds that allow every date.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True when at least one side is configured.
    pub fn is_bounded(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// True when `date` falls inside the bounds (inclusive on both sides).
    pub fn contains(&self, date: Date) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}
