//! Calendar arithmetic for due-date buckets.
//!
//! All functions take the reference day as a parameter; nothing here reads
//! the system clock.

use crate::query::QueryError;
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// First day of the week containing `today`.
///
/// `week_start` selects which weekday opens a week (Monday by default in
/// [`crate::config::QueryConfig`]). A week that begins before
/// `NaiveDate::MIN` is clamped to it.
pub fn start_of_week(today: NaiveDate, week_start: Weekday) -> NaiveDate {
    today
        .week(week_start)
        .checked_first_day()
        .unwrap_or(NaiveDate::MIN)
}

/// Last day of the week containing `today` (inclusive), clamped to
/// `NaiveDate::MAX`.
pub fn end_of_week(today: NaiveDate, week_start: Weekday) -> NaiveDate {
    today
        .week(week_start)
        .checked_last_day()
        .unwrap_or(NaiveDate::MAX)
}

/// First day of the month containing `today`.
pub fn start_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// Last day of the month containing `today` (inclusive).
///
/// The last representable month ends at `NaiveDate::MAX`.
pub fn end_of_month(today: NaiveDate) -> NaiveDate {
    start_of_month(today)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(NaiveDate::MAX)
}

/// Parse a weekday name as written in configuration ("monday", "Sun", ...)
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    value.trim().parse::<Weekday>().ok()
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| QueryError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_bounds_monday_start() {
        // 2013-12-09 is a Monday
        let today = date(2013, 12, 9);
        assert_eq!(start_of_week(today, Weekday::Mon), date(2013, 12, 9));
        assert_eq!(end_of_week(today, Weekday::Mon), date(2013, 12, 15));

        let sunday = date(2013, 12, 15);
        assert_eq!(start_of_week(sunday, Weekday::Mon), date(2013, 12, 9));
    }

    #[test]
    fn test_week_bounds_sunday_start() {
        let today = date(2013, 12, 9);
        assert_eq!(start_of_week(today, Weekday::Sun), date(2013, 12, 8));
        assert_eq!(end_of_week(today, Weekday::Sun), date(2013, 12, 14));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(start_of_month(date(2013, 12, 9)), date(2013, 12, 1));
        assert_eq!(end_of_month(date(2013, 12, 9)), date(2013, 12, 31));
        assert_eq!(end_of_month(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2023, 2, 28)), date(2023, 2, 28));
    }

    #[test]
    fn test_bounds_at_edges_of_date_range() {
        let max_week_start = start_of_week(NaiveDate::MAX, Weekday::Mon);
        assert!(max_week_start <= NaiveDate::MAX);
        assert_eq!(end_of_week(NaiveDate::MAX, Weekday::Mon), NaiveDate::MAX);
        assert_eq!(start_of_week(NaiveDate::MIN, Weekday::Mon), NaiveDate::MIN);
        assert!(end_of_week(NaiveDate::MIN, Weekday::Mon) >= NaiveDate::MIN);

        assert_eq!(end_of_month(NaiveDate::MAX), NaiveDate::MAX);
        let early_in_last_month = NaiveDate::MAX.with_day(5).unwrap();
        assert_eq!(end_of_month(early_in_last_month), NaiveDate::MAX);
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("Sun"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2013-12-09"), Ok(date(2013, 12, 9)));
        assert_eq!(
            parse_date("12/09/2013"),
            Err(QueryError::InvalidDate("12/09/2013".to_string()))
        );
        assert!(parse_date("2013-02-30").is_err());
    }
}
