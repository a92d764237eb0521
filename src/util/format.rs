//! Timestamp helpers for rendering backend `created_at` values.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime, Time};

/// Render a backend timestamp as `HH:MM`.
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00Z`) and naive ISO 8601
/// (`2024-05-01T09:30:00.123456`, `2024-05-01 09:30:00`). Anything else,
/// including an empty value, renders as an empty string.
#[must_use]
pub fn format_time(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };
    parse_clock(raw).map_or_else(String::new, |t| format!("{:02}:{:02}", t.hour(), t.minute()))
}

fn parse_clock(raw: &str) -> Option<Time> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt.time());
    }
    let normalized = raw.replacen(' ', "T", 1);
    PrimitiveDateTime::parse(&normalized, &Iso8601::DEFAULT).ok().map(PrimitiveDateTime::time)
}

/// Current UTC time as RFC 3339, used to stamp optimistic messages.
#[must_use]
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// Current Unix time in milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}
