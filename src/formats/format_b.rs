use std::sync::LazyLock;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;

use crate::error::{Result, TimestampParseError};
use crate::record::{CanonicalRecord, FormatBRecord};

// `\d` would accept non-ASCII digits.
static TIMESTAMP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{6}Z$")
        .unwrap_or_else(|e| panic!("invalid timestamp pattern: {e}"))
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

pub fn convert(rec: FormatBRecord) -> Result<CanonicalRecord> {
    let timestamp = parse_timestamp_ms(&rec.timestamp)?;

    Ok(CanonicalRecord {
        device_id: rec.device.id,
        device_type: rec.device.kind,
        timestamp,
        location: rec.location,
        data: rec.data,
    })
}

/// Parses `YYYY-MM-DDTHH:MM:SS.ffffffZ` as UTC and returns epoch
/// milliseconds. Sub-millisecond precision is truncated toward zero.
pub fn parse_timestamp_ms(raw: &str) -> std::result::Result<i64, TimestampParseError> {
    let fail = |reason: String| TimestampParseError {
        raw: raw.to_string(),
        reason,
    };

    if !TIMESTAMP_SHAPE.is_match(raw) {
        return Err(fail("expected YYYY-MM-DDTHH:MM:SS.ffffffZ".to_string()));
    }
    let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| fail(e.to_string()))?;
    // chrono encodes :60 as a leap second instead of rejecting it
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(fail("second out of range".to_string()));
    }

    Ok(parsed.and_utc().timestamp_micros() / 1000)
}
