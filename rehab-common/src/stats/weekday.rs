//! Weekday conventions
//!
//! chrono numbers weekdays from Monday (Mon=0..Sun=6), while exercise
//! schedules are stored Sunday-first (Sun=0..Sat=6). All conversions between
//! the two go through [`to_sunday0`].

use chrono::{Datelike, Duration, NaiveDate};

/// Convert a Monday-first weekday index (0..=6) to the Sunday-first index
pub fn to_sunday0(weekday_mon0: u8) -> u8 {
    (weekday_mon0 + 1) % 7
}

/// Sunday-first weekday index of a calendar date
pub fn sunday0_of(date: NaiveDate) -> u8 {
    // num_days_from_monday is always 0..=6
    to_sunday0(date.weekday().num_days_from_monday() as u8)
}

/// Monday and Sunday of the week containing `date`
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let sunday = monday + Duration::days(6);
    (monday, sunday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_to_sunday0_all_inputs() {
        // Mon..Sun in Monday-first order map to 1..6 then 0
        let expected = [1, 2, 3, 4, 5, 6, 0];
        for (mon0, want) in expected.iter().enumerate() {
            assert_eq!(to_sunday0(mon0 as u8), *want, "mon0 = {}", mon0);
        }
    }

    #[test]
    fn test_sunday0_of_known_dates() {
        // 2024-05-05 is a Sunday, 2024-05-11 a Saturday
        assert_eq!(sunday0_of(date("2024-05-05")), 0);
        assert_eq!(sunday0_of(date("2024-05-06")), 1);
        assert_eq!(sunday0_of(date("2024-05-08")), 3);
        assert_eq!(sunday0_of(date("2024-05-11")), 6);
    }

    #[test]
    fn test_week_bounds_monday_to_sunday() {
        for day in 6..=12 {
            let reference = date(&format!("2024-05-{:02}", day));
            let (monday, sunday) = week_bounds(reference);
            assert_eq!(monday, date("2024-05-06"));
            assert_eq!(sunday, date("2024-05-12"));
            assert_eq!(monday.weekday(), Weekday::Mon);
            assert_eq!((sunday - monday).num_days(), 6);
        }
    }

    #[test]
    fn test_week_bounds_cross_month_and_year() {
        // Wednesday 2025-01-01 belongs to the week starting Monday 2024-12-30
        let (monday, sunday) = week_bounds(date("2025-01-01"));
        assert_eq!(monday, date("2024-12-30"));
        assert_eq!(sunday, date("2025-01-05"));
    }
}
