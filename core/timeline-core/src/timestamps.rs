//! Timestamp parsing and display formatting.
//!
//! Session logs carry ISO 8601 timestamps, usually with a `Z` suffix. Display
//! strings are shifted by a fixed hour offset and carry no timezone marker.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Display format for rendered timestamps: zero-padded and fixed-width, so
/// lexical order matches chronological order.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

// `%z` accepts both `+0700` and `+07:00`.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO 8601 timestamp into UTC. Values without an offset are taken
/// as UTC, and a bare date is midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Formats a raw timestamp for display, shifted by `offset_hours`.
/// Unparseable input is returned unchanged.
pub fn to_display(raw: &str, offset_hours: i64) -> String {
    match parse_timestamp(raw) {
        Some(dt) => (dt + Duration::hours(offset_hours))
            .format(DISPLAY_FORMAT)
            .to_string(),
        None => raw.to_string(),
    }
}

/// Parses a display string back into a naive wall-clock time.
pub fn parse_display(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DISPLAY_FORMAT).ok()
}

/// Whole minutes between two raw timestamps, truncated toward zero.
/// Returns 0 if either side fails to parse.
pub fn duration_minutes(first: &str, last: &str) -> i64 {
    match (parse_timestamp(first), parse_timestamp(last)) {
        (Some(start), Some(end)) => end.signed_duration_since(start).num_minutes(),
        _ => 0,
    }
}
