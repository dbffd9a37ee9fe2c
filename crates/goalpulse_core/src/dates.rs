//! Timestamp parsing and calendar-day normalization.
//!
//! # Responsibility
//! - Parse stored timestamp strings into exact instants.
//! - Map timestamps to calendar days without timezone drift.
//!
//! # Invariants
//! - Calendar-day normalization extracts the stored date portion textually and
//!   rebuilds midnight in the configured local offset. The raw instant is never
//!   shifted into another zone to find its day.
//! - Date-only and offset-less values are read as local wall-clock time.
//! - The local offset is always passed in; the machine zone is never read.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{4})-(\d{2})-(\d{2})").expect("valid date prefix regex")
});

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// How a timestamp should be interpreted by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSemantic {
    /// Local midnight of the stored calendar date. Required for bucketing.
    CalendarDay,
    /// The exact instant. Sufficient for ordering only.
    ExactInstant,
}

/// Parses a stored timestamp into an exact instant.
///
/// Accepts RFC 3339 (`2024-02-01T10:00:00Z`, `...+05:30`), minute precision
/// (`2024-02-01T10:00Z`), offsets without a colon, naive date-times and
/// date-only strings. Returns `None` on failure.
pub fn parse_instant(raw: &str, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant);
    }
    if let Some(instant) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(instant);
    }
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(local_midnight(day, tz));
    }
    NAIVE_DATETIME_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .map(|naive| local_datetime(&naive, tz))
    })
}

/// Extracts the calendar date written in a stored timestamp.
///
/// `2024-01-31T23:30:00-08:00` is day `2024-01-31` regardless of the local
/// offset, because the stored representation says so.
pub fn calendar_day(raw: &str) -> Option<NaiveDate> {
    let captures = DATE_PREFIX_RE.captures(raw)?;
    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalizes a stored timestamp string under the requested semantic.
///
/// Returns `None` when the value does not parse as a timestamp at all.
pub fn normalize_timestamp(
    raw: &str,
    semantic: DateSemantic,
    tz: &FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    let instant = parse_instant(raw, tz)?;
    match semantic {
        DateSemantic::ExactInstant => Some(instant),
        DateSemantic::CalendarDay => calendar_day(raw).map(|day| local_midnight(day, tz)),
    }
}

/// Normalizes a native time value under the requested semantic.
pub fn normalize_instant(
    value: DateTime<FixedOffset>,
    semantic: DateSemantic,
    tz: &FixedOffset,
) -> DateTime<FixedOffset> {
    match semantic {
        DateSemantic::ExactInstant => value,
        DateSemantic::CalendarDay => local_midnight(value.date_naive(), tz),
    }
}

/// Midnight at the start of `day` in the local offset.
pub fn local_midnight(day: NaiveDate, tz: &FixedOffset) -> DateTime<FixedOffset> {
    local_datetime(&day.and_time(NaiveTime::MIN), tz)
}

/// Unix epoch milliseconds for an instant.
pub fn to_epoch_millis(instant: &DateTime<FixedOffset>) -> i64 {
    instant.timestamp_millis()
}

fn local_datetime(naive: &NaiveDateTime, tz: &FixedOffset) -> DateTime<FixedOffset> {
    tz.from_local_datetime(naive)
        .single()
        .unwrap_or_else(|| tz.from_utc_datetime(naive))
}
