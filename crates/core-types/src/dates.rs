use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only layouts, tried in order. Month-first wins over day-first for
/// slash-separated input.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
];

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses a calendar date from any of the layouts found in commodity price exports.
///
/// Datetime strings are accepted and truncated to their date part.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let s = raw.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(CoreError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2020-03-11").unwrap(), ymd(2020, 3, 11));
        assert_eq!(parse_date("  2020-03-11 ").unwrap(), ymd(2020, 3, 11));
    }

    #[test]
    fn parses_brent_export_layouts() {
        assert_eq!(parse_date("20-May-87").unwrap(), ymd(1987, 5, 20));
        assert_eq!(parse_date("02-Jan-05").unwrap(), ymd(2005, 1, 2));
        assert_eq!(parse_date("Apr 22, 2020").unwrap(), ymd(2020, 4, 22));
    }

    #[test]
    fn slash_dates_are_month_first_when_ambiguous() {
        assert_eq!(parse_date("03/04/2020").unwrap(), ymd(2020, 3, 4));
        assert_eq!(parse_date("25/12/2019").unwrap(), ymd(2019, 12, 25));
        assert_eq!(parse_date("2019/12/25").unwrap(), ymd(2019, 12, 25));
    }

    #[test]
    fn datetimes_keep_only_the_date() {
        assert_eq!(parse_date("2022-02-24 13:45:00").unwrap(), ymd(2022, 2, 24));
        assert_eq!(parse_date("2022-02-24T13:45:00").unwrap(), ymd(2022, 2, 24));
        assert_eq!(parse_date("2022-02-24T13:45:00+00:00").unwrap(), ymd(2022, 2, 24));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_date("not-a-date"),
            Err(CoreError::InvalidDate("not-a-date".to_string()))
        );
        assert!(parse_date("").is_err());
        assert!(parse_date("2020-13-40").is_err());
    }
}
