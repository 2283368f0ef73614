//! Tests for calendar windows and timezone handling

use chrono::{NaiveDate, TimeZone, Utc};
use core_kernel::{DateRange, MonthKey, TemporalError, Timezone};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod date_range {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_range() {
        let result = DateRange::new(date(2024, 3, 2), date(2024, 3, 1));
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 7)).unwrap();
        assert!(range.contains(date(2024, 3, 1)));
        assert!(range.contains(date(2024, 3, 7)));
        assert!(!range.contains(date(2024, 3, 8)));
        assert_eq!(range.days(), 7);
    }

    #[test]
    fn test_single_day() {
        let range = DateRange::single_day(date(2024, 5, 5));
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn test_contains_instant_uses_timezone() {
        let range = DateRange::single_day(date(2024, 3, 1));
        let late_evening_utc = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
        let tokyo: Timezone = "Asia/Tokyo".parse().unwrap();

        assert!(range.contains_instant(late_evening_utc, &Timezone::default()));
        assert!(!range.contains_instant(late_evening_utc, &tokyo));
    }
}

mod month_key {
    use super::*;

    #[test]
    fn test_for_month_covers_whole_month() {
        let range = DateRange::for_month("2023-02".parse().unwrap());
        assert_eq!(range.start, date(2023, 2, 1));
        assert_eq!(range.end, date(2023, 2, 28));
    }

    #[test]
    fn test_of_date() {
        let month = MonthKey::of(date(2024, 11, 30));
        assert_eq!(month.to_string(), "2024-11");
        assert!(month.contains(date(2024, 11, 1)));
        assert!(!month.contains(date(2024, 12, 1)));
    }

    #[test]
    fn test_serde_as_string() {
        let month = MonthKey::new(2024, 7).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2024-07\"");

        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let result: Result<MonthKey, _> = serde_json::from_str("\"2024-00\"");
        assert!(result.is_err());
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_parse_unknown_zone() {
        let result = "Mars/Olympus".parse::<Timezone>();
        assert!(matches!(result, Err(TemporalError::InvalidTimezone(_))));
    }

    #[test]
    fn test_local_date_in_zone() {
        let tz: Timezone = "Europe/Berlin".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 1, 14, 23, 30, 0).unwrap();
        assert_eq!(tz.local_date(instant), date(2024, 1, 15));
    }

    #[test]
    fn test_serializes_iana_name() {
        let tz: Timezone = "America/Chicago".parse().unwrap();
        assert_eq!(serde_json::to_string(&tz).unwrap(), "\"America/Chicago\"");
    }
}
