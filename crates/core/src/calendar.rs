#![forbid(unsafe_code)]

//! Week boundary resolver.
//!
//! Scheduling weeks run Friday through Thursday. Every date maps to the most
//! recent Friday on or before it; a Friday maps to itself. Week lookup by
//! `week_start` must agree exactly with these functions, so they are the only
//! place a date is ever snapped to a week boundary.

use time::{Date, Duration, OffsetDateTime, Weekday};

/// First day of every scheduling week.
pub const WEEK_ANCHOR: Weekday = Weekday::Friday;

/// Number of days a week spans beyond its start.
pub const WEEK_SPAN_DAYS: i64 = 6;

pub fn week_start_for(date: Date) -> Date {
    let offset = i64::from(date.weekday().number_days_from_monday())
        - i64::from(WEEK_ANCHOR.number_days_from_monday());
    date - Duration::days(offset.rem_euclid(7))
}

pub fn week_end_for(week_start: Date) -> Date {
    week_start + Duration::days(WEEK_SPAN_DAYS)
}

pub fn is_week_start(date: Date) -> bool {
    date.weekday() == WEEK_ANCHOR
}

/// UTC calendar day containing the given unix-epoch millisecond instant.
pub fn date_at_ms(ts_ms: i64) -> Date {
    let nanos = i128::from(ts_ms) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .date()
}
