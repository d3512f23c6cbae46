#![forbid(unsafe_code)]

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const DATE_FMT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub(crate) fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub(crate) fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

pub(crate) fn parse_rfc3339_ms(raw: &str) -> Option<i64> {
    let dt = OffsetDateTime::parse(raw, &Rfc3339).ok()?;
    let ms = dt.unix_timestamp_nanos() / 1_000_000i128;
    i64::try_from(ms).ok()
}

pub(crate) fn format_date(date: Date) -> String {
    date.format(&DATE_FMT)
        .unwrap_or_else(|_| "1970-01-01".to_string())
}

pub(crate) fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, &DATE_FMT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn rfc3339_round_trips_at_millisecond_precision() {
        let ms = 1_709_251_200_000; // 2024-03-01T00:00:00Z
        assert_eq!(parse_rfc3339_ms(&ts_ms_to_rfc3339(ms)), Some(ms));
        assert_eq!(parse_rfc3339_ms("2024-03-01T09:30:00Z"), Some(ms + 34_200_000));
        assert_eq!(parse_rfc3339_ms("not a timestamp"), None);
    }

    #[test]
    fn date_encoding_is_iso_8601() {
        assert_eq!(format_date(date!(2024 - 03 - 01)), "2024-03-01");
        assert_eq!(parse_date("2024-03-01"), Some(date!(2024 - 03 - 01)));
        assert_eq!(parse_date("03/01/2024"), None);
    }
}
