//! Temporal normalizer
//!
//! Coerces date-like cells from mixed source formats into `chrono` types.
//! A value that fails every format becomes `None` ("unknown"), never an
//! error: downstream date filters treat unknown as not-matching, so a record
//! with an unparseable due date is excluded from overdue/due-soon sets
//! rather than silently treated as today.

use chrono::{NaiveDate, NaiveDateTime};

/// Date formats accepted, tried in order. ISO first; day-first for the
/// slash and dash variants.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Timestamp formats accepted, tried in order
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a date cell. Timestamp values are accepted and truncated to their
/// date part. Returns `None` for blank or unparseable input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    parse_datetime(trimmed).map(|dt| dt.date())
}

/// Parse a timestamp cell. Date-only values normalize to midnight.
/// Returns `None` for blank or unparseable input.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a numeric cell. Returns `None` for blank or unparseable input.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
