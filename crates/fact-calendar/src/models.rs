//! Data models for the month calendar

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::error::{CalendarError, Result};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Look up a month number (1-12) by its English name.
///
/// Matching is case-insensitive and accepts the three-letter abbreviation.
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|m| {
            let m = m.to_lowercase();
            m == name || m[..3] == name
        })
        .map(|i| i as u32 + 1)
}

/// A displayed calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthView {
    year: i32,
    month: u32,
}

impl MonthView {
    /// Create a month view. `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CalendarError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// The month that contains `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month containing the local current date
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Full English month name, e.g. "October"
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Three-letter abbreviation, e.g. "Oct"
    pub fn abbreviation(&self) -> &'static str {
        &self.name()[..3]
    }

    pub fn first_day(&self) -> NaiveDate {
        // `new` and `containing` guarantee the first of the month exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month {
            4 | 6 | 9 | 11 => 30,
            2 if NaiveDate::from_ymd_opt(self.year, 2, 29).is_some() => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// Number of empty cells before day 1 in a Sunday-first week grid
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// The following month. Stays put at the last month chrono can represent.
    pub fn next(&self) -> Self {
        let (year, month) = match self.month {
            12 => (self.year + 1, 1),
            m => (self.year, m + 1),
        };
        Self::new(year, month).unwrap_or(*self)
    }

    /// The preceding month. Stays put at the first month chrono can represent.
    pub fn previous(&self) -> Self {
        let (year, month) = match self.month {
            1 => (self.year - 1, 12),
            m => (self.year, m - 1),
        };
        Self::new(year, month).unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

impl FromStr for MonthView {
    type Err = CalendarError;

    /// Parses `YYYY-MM` (e.g. `2025-10`)
    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| CalendarError::ParseError(format!("expected YYYY-MM, got '{}'", s)))?;

        let year: i32 = year
            .parse()
            .map_err(|_| CalendarError::ParseError(format!("invalid year in '{}'", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| CalendarError::ParseError(format!("invalid month in '{}'", s)))?;

        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names() {
        let view = MonthView::new(2025, 10).unwrap();
        assert_eq!(view.name(), "October");
        assert_eq!(view.abbreviation(), "Oct");
        assert_eq!(view.to_string(), "October 2025");
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(MonthView::new(2025, 0), Err(CalendarError::InvalidMonth(0)));
        assert_eq!(MonthView::new(2025, 13), Err(CalendarError::InvalidMonth(13)));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(MonthView::new(2025, 10).unwrap().days_in_month(), 31);
        assert_eq!(MonthView::new(2025, 11).unwrap().days_in_month(), 30);
        assert_eq!(MonthView::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthView::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthView::new(1900, 2).unwrap().days_in_month(), 28);
    }

    #[test]
    fn test_leading_blanks() {
        // 2025-10-01 is a Wednesday
        assert_eq!(MonthView::new(2025, 10).unwrap().leading_blanks(), 3);
        // 2025-06-01 is a Sunday
        assert_eq!(MonthView::new(2025, 6).unwrap().leading_blanks(), 0);
    }

    #[test]
    fn test_navigation_wraps_years() {
        let dec = MonthView::new(2025, 12).unwrap();
        assert_eq!(dec.next(), MonthView::new(2026, 1).unwrap());
        assert_eq!(dec.next().previous(), dec);

        let jan = MonthView::new(2025, 1).unwrap();
        assert_eq!(jan.previous(), MonthView::new(2024, 12).unwrap());
    }

    #[test]
    fn test_navigation_stops_at_date_limits() {
        let last = MonthView::containing(NaiveDate::MAX);
        assert_eq!(last.next(), last);
        assert_eq!(last.first_day(), NaiveDate::from_ymd_opt(last.year(), last.month(), 1).unwrap());

        let first = MonthView::containing(NaiveDate::MIN);
        assert_eq!(first.previous(), first);
        assert_eq!(first.previous().first_day(), first.first_day());
    }

    #[test]
    fn test_parse_month_view() {
        let view: MonthView = "2025-03".parse().unwrap();
        assert_eq!(view.year(), 2025);
        assert_eq!(view.month(), 3);

        assert!("2025".parse::<MonthView>().is_err());
        assert!("2025-xx".parse::<MonthView>().is_err());
        assert_eq!(
            "2025-14".parse::<MonthView>(),
            Err(CalendarError::InvalidMonth(14))
        );
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("October"), Some(10));
        assert_eq!(month_number("october"), Some(10));
        assert_eq!(month_number("Sep"), Some(9));
        assert_eq!(month_number("Octember"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn test_contains() {
        let view = MonthView::new(2025, 10).unwrap();
        assert!(view.contains(NaiveDate::from_ymd_opt(2025, 10, 31).unwrap()));
        assert!(!view.contains(NaiveDate::from_ymd_opt(2024, 10, 31).unwrap()));
    }
}
