//! UTC day bucketing
//!
//! Streaks and the daily activity chart both count whole UTC calendar days.
//! Buckets are rendered as "YYYY-MM-DD", which also sorts chronologically.

use chrono::{DateTime, NaiveDate, Utc};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// The UTC calendar day `at` falls on.
pub fn day_bucket(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Render a day as "YYYY-MM-DD".
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parse a "YYYY-MM-DD" bucket back into a day.
pub fn parse_day_bucket(bucket: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(bucket, DAY_FORMAT).ok()
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_bucket_is_utc() {
        let late = Utc.with_ymd_and_hms(2023, 12, 28, 23, 59, 59).unwrap();
        assert_eq!(format_day(day_bucket(late)), "2023-12-28");

        let next = Utc.with_ymd_and_hms(2023, 12, 29, 0, 0, 0).unwrap();
        assert_eq!(format_day(day_bucket(next)), "2023-12-29");
    }

    #[test]
    fn test_parse_day_bucket() {
        let day = parse_day_bucket("2024-02-29").unwrap();
        assert_eq!(format_day(day), "2024-02-29");

        assert!(parse_day_bucket("2023-02-29").is_none());
        assert!(parse_day_bucket("2023-12").is_none());
        assert!(parse_day_bucket("invalid").is_none());
    }

    #[test]
    fn test_days_between() {
        let a = parse_day_bucket("2026-01-30").unwrap();
        let b = parse_day_bucket("2026-02-02").unwrap();
        assert_eq!(days_between(a, b), 3);
        assert_eq!(days_between(b, a), -3);
        assert_eq!(days_between(a, a), 0);
    }
}
