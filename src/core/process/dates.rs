//! Date normalization
//!
//! The Books API expects plain `YYYY-MM-DD` dates. Invoices arrive with a
//! single fixed timestamp format; bills come from more varied sources and
//! are parsed permissively.

use crate::core::mapping::Payload;
use crate::domain::{LedgerError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Output format for every normalized date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format of invoice dates
pub const ISO_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[DATE_FORMAT, "%m/%d/%Y", "%d %b %Y", "%b %d, %Y", "%B %d, %Y"];

/// Parse an ISO-8601 UTC timestamp (`2024-01-05T00:00:00Z`)
pub fn parse_iso_utc(value: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(value, ISO_UTC_FORMAT)
        .ok()
        .map(|dt| dt.date())
}

/// Parse a date in any of the commonly seen representations
///
/// Accepts RFC 3339, ISO date-times with or without zone, space-separated
/// date-times, plain ISO dates, `MM/DD/YYYY`, `DD Mon YYYY` and
/// `Mon DD, YYYY`. Zoned values keep their local calendar date.
pub fn parse_flexible(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Some(date) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
    {
        return Some(date.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
}

/// Rewrite date fields of a payload in place
///
/// Absent fields are left alone. A present field that is not a string or
/// does not parse fails the record.
pub fn normalize_fields(
    payload: &mut Payload,
    fields: &[&str],
    parse: fn(&str) -> Option<NaiveDate>,
) -> Result<()> {
    for field in fields {
        let Some(value) = payload.get(*field) else {
            continue;
        };

        let date = value.as_str().and_then(parse).ok_or_else(|| {
            LedgerError::Mapping(format!("Field '{field}' has unrecognized date {value}"))
        })?;

        payload.insert(
            (*field).to_string(),
            Value::String(date.format(DATE_FORMAT).to_string()),
        );
    }
    Ok(())
}
