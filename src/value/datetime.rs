//! Date/time text parsing
//!
//! Accepted forms, tried in order: `@<unix seconds>`, RFC 3339, date-times
//! with a numeric offset, naive date-times (taken as UTC) and plain dates
//! (midnight UTC).

use crate::constants::{DATE_FORMAT, DATETIME_FORMATS_NAIVE, DATETIME_FORMATS_WITH_OFFSET};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Parse date/time text into an offset-aware timestamp
pub fn parse_datetime(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    let value = raw.trim();

    if let Some(seconds) = value.strip_prefix('@') {
        let seconds = seconds
            .parse::<i64>()
            .map_err(|e| format!("invalid unix timestamp: {}", e))?;
        return from_timestamp(seconds);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }

    for format in DATETIME_FORMATS_WITH_OFFSET {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    for format in DATETIME_FORMATS_NAIVE {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().fixed_offset());
        }
    }

    Err("unrecognized date/time (expected RFC 3339, 'YYYY-MM-DD HH:MM:SS[ +ZZZZ]', 'YYYY-MM-DD' or '@<seconds>')".to_string())
}

/// Interpret unix seconds as a UTC timestamp
pub fn from_timestamp(seconds: i64) -> Result<DateTime<FixedOffset>, String> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| format!("unix timestamp out of range: {}", seconds))
}
