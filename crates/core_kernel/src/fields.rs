//! Form field normalisation
//!
//! Case files arrive from HTML forms where an untouched input is an empty
//! string rather than a missing value, and date inputs produce `YYYY-MM-DD`.
//! Older records sometimes hold full timestamps in date fields instead.

use chrono::{DateTime, NaiveDate};

use crate::error::CoreError;

/// Trims a free-text value, mapping blank input to `None`
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parses a calendar date field
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (the date part is kept).
/// Blank input yields `Ok(None)`.
pub fn parse_calendar_date(value: &str) -> Result<Option<NaiveDate>, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| Some(ts.date_naive()))
        .map_err(|_| CoreError::invalid_date(trimmed))
}
