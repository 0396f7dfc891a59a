use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Number of days in the given month, 0 for an invalid month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return 0,
    };
    // First day of the following month, minus one day
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        None => 0,
    }
}

/// All dates of the month in order
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

/// Formats a date as YYYY-MM-DD from its parts, zero padded
pub fn fmt_ymd(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Formats a date as YYYY-MM-DD
pub fn fmt_date(date: NaiveDate) -> String {
    fmt_ymd(date.year(), date.month(), date.day())
}

/// Parses a YYYY-MM-DD string
pub fn parse_ymd(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn weekday_of(year: i32, month: u32, day: u32) -> Option<Weekday> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.weekday())
}

/// Saturday and Sunday are weekend days
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Short weekday label used in the matrix header (T2 = Monday ... CN = Sunday)
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "T2",
        Weekday::Tue => "T3",
        Weekday::Wed => "T4",
        Weekday::Thu => "T5",
        Weekday::Fri => "T6",
        Weekday::Sat => "T7",
        Weekday::Sun => "CN",
    }
}

/// Counts days of the month that are neither weekend days nor holidays
pub fn working_days(year: i32, month: u32, holidays: &HashSet<NaiveDate>) -> u32 {
    month_days(year, month)
        .into_iter()
        .filter(|d| !is_weekend(*d) && !holidays.contains(d))
        .count() as u32
}

/// True when the date falls in the selected (year, month)
pub fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 9), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn test_fmt_ymd_pads() {
        assert_eq!(fmt_ymd(2025, 9, 1), "2025-09-01");
        assert_eq!(fmt_ymd(2025, 12, 31), "2025-12-31");
    }

    #[test]
    fn test_weekend_and_labels() {
        // 2025-09-06 is a Saturday
        let sat = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap();
        let mon = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        assert!(is_weekend(sat));
        assert!(!is_weekend(mon));
        assert_eq!(weekday_label(sat), "T7");
        assert_eq!(weekday_label(mon), "T2");
        assert_eq!(weekday_of(2025, 9, 7), Some(Weekday::Sun));
    }

    #[test]
    fn test_working_days_skips_holidays() {
        // September 2025 has 22 weekdays; 2025-09-02 is a Tuesday holiday
        let mut holidays = HashSet::new();
        assert_eq!(working_days(2025, 9, &holidays), 22);
        holidays.insert(NaiveDate::from_ymd_opt(2025, 9, 2).unwrap());
        assert_eq!(working_days(2025, 9, &holidays), 21);
    }

    #[test]
    fn test_parse_ymd() {
        assert_eq!(parse_ymd(" 2025-09-01 "), NaiveDate::from_ymd_opt(2025, 9, 1));
        assert_eq!(parse_ymd("2025/09/01"), None);
    }
}
