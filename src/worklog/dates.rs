//! Calendar helpers: ISO week bounds and local-time date parsing.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};

use crate::error::ParseError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Monday and Sunday of ISO week `iso_week` in `year`.
///
/// Anchors on July 1st (always inside the ISO year), steps back to its Monday
/// and moves whole weeks from there.
pub fn week_start_end(year: i32, iso_week: u32) -> (NaiveDate, NaiveDate) {
    let anchor = NaiveDate::from_ymd_opt(year, 7, 1).unwrap_or(NaiveDate::MIN);
    let monday = anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()));
    let anchor_week = i64::from(monday.iso_week().week());
    let start = monday + Duration::weeks(i64::from(iso_week) - anchor_week);
    (start, start + Duration::days(6))
}

/// Monday and Sunday of the ISO week containing `date`.
pub fn iso_week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let week = date.iso_week();
    week_start_end(week.year(), week.week())
}

/// Today in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whether `date` is today in the local timezone.
pub fn is_today(date: NaiveDate) -> bool {
    date == today()
}

/// Strict `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = text.trim();
    if trimmed.len() != 10 {
        return Err(ParseError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(text.to_string()))
}

/// Strict `HH:MM`, 24-hour clock.
pub fn parse_time(text: &str) -> Result<NaiveTime, ParseError> {
    let trimmed = text.trim();
    if trimmed.len() != 5 {
        return Err(ParseError::InvalidTime(text.to_string()));
    }
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .map_err(|_| ParseError::InvalidTime(text.to_string()))
}

/// Optional date argument, defaulting to today.
pub fn date_or_today(text: Option<&str>) -> Result<NaiveDate, ParseError> {
    text.map(parse_date).unwrap_or_else(|| Ok(today()))
}

/// Formats as `YYYY-MM-DD`, the form the REST API expects.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, DATE_FORMAT).unwrap()
    }

    #[test]
    fn first_week_of_2024_starts_on_new_years_day() {
        assert_eq!(week_start_end(2024, 1), (date("2024-01-01"), date("2024-01-07")));
    }

    #[test]
    fn week_one_may_start_in_previous_year() {
        assert_eq!(week_start_end(2025, 1), (date("2024-12-30"), date("2025-01-05")));
        assert_eq!(week_start_end(2021, 1), (date("2021-01-04"), date("2021-01-10")));
        assert_eq!(week_start_end(2020, 53), (date("2020-12-28"), date("2021-01-03")));
    }

    #[test]
    fn anchor_on_sunday_goes_back_six_days() {
        // 2029-07-01 is a Sunday.
        assert_eq!(week_start_end(2029, 26), (date("2029-06-25"), date("2029-07-01")));
    }

    #[test]
    fn iso_week_bounds_contain_the_date() {
        for text in ["2024-01-01", "2024-02-29", "2023-01-01", "2026-12-31"] {
            let day = date(text);
            let (start, end) = iso_week_bounds(day);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert!(start <= day && day <= end, "{text}");
        }
    }

    #[test]
    fn parses_and_rejects_dates_and_times() {
        assert_eq!(parse_date("2024-03-04"), Ok(date("2024-03-04")));
        assert!(parse_date("2024-3-4").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert_eq!(
            parse_time("09:30"),
            Ok(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
        );
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("9:30").is_err());
    }

    #[test]
    fn today_is_today() {
        assert!(is_today(today()));
        assert!(!is_today(today() - Duration::days(1)));
    }
}
