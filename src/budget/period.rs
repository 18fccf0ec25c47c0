//! Calendar arithmetic and reference-period matching.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Last day scanned when a query asks for no period filter at all.
pub fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Granularity of a reference period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Month,
    Year,
    #[default]
    All,
}

impl PeriodType {
    /// Parses a period label; anything unrecognised means "no filter".
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" => PeriodType::Day,
            "month" => PeriodType::Month,
            "year" => PeriodType::Year,
            _ => PeriodType::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Day => "day",
            PeriodType::Month => "month",
            PeriodType::Year => "year",
            PeriodType::All => "all",
        }
    }

    /// Whether `date` lies in the same period as `reference`.
    pub fn matches(&self, date: NaiveDate, reference: NaiveDate) -> bool {
        match self {
            PeriodType::Day => date == reference,
            PeriodType::Month => {
                date.year() == reference.year() && date.month() == reference.month()
            }
            PeriodType::Year => date.year() == reference.year(),
            PeriodType::All => true,
        }
    }

    /// Last calendar day of the period containing `date`.
    pub fn period_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodType::Day => date,
            PeriodType::Month => end_of_month(date),
            PeriodType::Year => {
                NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or_else(far_future)
            }
            PeriodType::All => far_future(),
        }
    }

    /// First calendar day of the period containing `date`.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodType::Day => date,
            PeriodType::Month => date.with_day(1).unwrap_or(date),
            PeriodType::Year => date.with_ordinal(1).unwrap_or(date),
            PeriodType::All => NaiveDate::MIN,
        }
    }
}

impl From<&str> for PeriodType {
    fn from(raw: &str) -> Self {
        PeriodType::parse_lenient(raw)
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-function form of [`PeriodType::matches`].
pub fn matches(date: NaiveDate, reference: NaiveDate, period: PeriodType) -> bool {
    period.matches(date, reference)
}

/// Free-function form of [`PeriodType::period_end`].
pub fn period_end(date: NaiveDate, period: PeriodType) -> NaiveDate {
    period.period_end(date)
}

/// Advances one month from the first of the month, then steps back a day.
fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    shift_month(first, 1) - Duration::days(1)
}

/// Moves `date` by `months`, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    try_shift_month(date, months).unwrap_or(date)
}

/// Like [`shift_month`], but `None` once the result leaves chrono's range.
pub fn try_shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = (date.year() * 12 + date.month0() as i32).checked_add(months)?;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Moves `date` by `years`; Feb 29 becomes Feb 28 outside leap years.
pub fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    try_shift_year(date, years).unwrap_or(date)
}

pub fn try_shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

/// Parses an ISO `YYYY-MM-DD` date, tolerating a trailing time component.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_match_ignores_day_of_month() {
        assert!(matches(d(2024, 3, 1), d(2024, 3, 31), PeriodType::Month));
        assert!(!matches(d(2024, 4, 1), d(2024, 3, 31), PeriodType::Month));
        assert!(!matches(d(2023, 3, 1), d(2024, 3, 31), PeriodType::Month));
    }

    #[test]
    fn day_and_year_matching() {
        assert!(PeriodType::Day.matches(d(2024, 5, 5), d(2024, 5, 5)));
        assert!(!PeriodType::Day.matches(d(2024, 5, 5), d(2024, 5, 6)));
        assert!(PeriodType::Year.matches(d(2024, 1, 1), d(2024, 12, 31)));
        assert!(!PeriodType::Year.matches(d(2025, 1, 1), d(2024, 12, 31)));
        assert!(PeriodType::All.matches(d(1999, 1, 1), d(2024, 12, 31)));
    }

    #[test]
    fn unknown_labels_disable_filtering() {
        assert_eq!(PeriodType::parse_lenient("week"), PeriodType::All);
        assert_eq!(PeriodType::from(" Month "), PeriodType::Month);
    }

    #[test]
    fn period_end_handles_february() {
        assert_eq!(period_end(d(2023, 2, 10), PeriodType::Month), d(2023, 2, 28));
        assert_eq!(period_end(d(2024, 2, 10), PeriodType::Month), d(2024, 2, 29));
        assert_eq!(period_end(d(2024, 12, 3), PeriodType::Month), d(2024, 12, 31));
        assert_eq!(period_end(d(2024, 6, 3), PeriodType::Year), d(2024, 12, 31));
        assert_eq!(period_end(d(2024, 6, 3), PeriodType::Day), d(2024, 6, 3));
        assert_eq!(period_end(d(2024, 6, 3), PeriodType::All), far_future());
    }

    #[test]
    fn shift_month_clamps_to_month_length() {
        assert_eq!(shift_month(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(shift_month(d(2023, 1, 31), 1), d(2023, 2, 28));
        assert_eq!(shift_month(d(2024, 1, 31), 3), d(2024, 4, 30));
        assert_eq!(shift_month(d(2024, 11, 15), 2), d(2025, 1, 15));
        assert_eq!(shift_month(d(2024, 1, 15), -1), d(2023, 12, 15));
    }

    #[test]
    fn shift_year_clamps_leap_day() {
        assert_eq!(shift_year(d(2024, 2, 29), 1), d(2025, 2, 28));
        assert_eq!(shift_year(d(2024, 2, 29), 4), d(2028, 2, 29));
    }

    #[test]
    fn parses_iso_dates_with_time_suffix() {
        assert_eq!(parse_iso_date("2024-03-05"), Some(d(2024, 3, 5)));
        assert_eq!(parse_iso_date("2024-03-05T10:00:00.000Z"), Some(d(2024, 3, 5)));
        assert_eq!(parse_iso_date("2024-02-30"), None);
        assert_eq!(parse_iso_date(""), None);
    }
}
