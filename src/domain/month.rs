use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Years representable in the "YYYY-MM" format. Keeping selections inside
/// this range means every month has a valid first and last calendar day.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// A (year, month) pair driving the monthly query range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthSelection {
    year: i32,
    month: u32,
}

impl MonthSelection {
    /// Create a selection, rejecting out-of-range months and years.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && YEAR_RANGE.contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The current calendar month in local time, the default at startup.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Advance one calendar month, saturating at the last representable
    /// month so repeated navigation cannot leave the valid year range.
    pub fn next(self) -> Self {
        if self.month == 12 {
            MonthSelection::new(self.year + 1, 1).unwrap_or(self)
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Recede one calendar month, saturating at the first representable
    /// month.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            MonthSelection::new(self.year - 1, 12).unwrap_or(self)
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First calendar day of the month (inclusive query bound).
    pub fn first_day(&self) -> NaiveDate {
        // year and month are validated on construction, well within
        // chrono's representable dates
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    /// Last calendar day of the month (inclusive query bound).
    pub fn last_day(&self) -> NaiveDate {
        let last = NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year + 1, 1, 1).unwrap());
        last.pred_opt().unwrap()
    }

    /// Whether a date falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthSelection {
    type Err = ParseMonthError;

    /// Parse "YYYY-MM" into a month selection.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_str, month_str) = s.trim().split_once('-').ok_or(ParseMonthError)?;
        let year: i32 = year_str.parse().map_err(|_| ParseMonthError)?;
        let month: u32 = month_str.parse().map_err(|_| ParseMonthError)?;
        MonthSelection::new(year, month).ok_or(ParseMonthError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthError;

impl fmt::Display for ParseMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month, expected YYYY-MM")
    }
}

impl std::error::Error for ParseMonthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_month() {
        assert!(MonthSelection::new(2026, 0).is_none());
        assert!(MonthSelection::new(2026, 13).is_none());
        assert!(MonthSelection::new(2026, 12).is_some());
    }

    #[test]
    fn test_rejects_out_of_range_year() {
        assert!(MonthSelection::new(0, 1).is_none());
        assert!(MonthSelection::new(-1, 1).is_none());
        assert!(MonthSelection::new(10000, 1).is_none());
        assert!(MonthSelection::new(1, 1).is_some());
        assert!(MonthSelection::new(9999, 12).is_some());
    }

    #[test]
    fn test_extreme_years_have_valid_bounds() {
        let first = MonthSelection::new(1, 1).unwrap();
        assert_eq!(first.first_day().to_string(), "0001-01-01");
        assert_eq!(first.last_day().to_string(), "0001-01-31");

        let last = MonthSelection::new(9999, 12).unwrap();
        assert_eq!(last.first_day().to_string(), "9999-12-01");
        assert_eq!(last.last_day().to_string(), "9999-12-31");
    }

    #[test]
    fn test_navigation_saturates_at_year_range() {
        let last = MonthSelection::new(9999, 12).unwrap();
        assert_eq!(last.next(), last);

        let first = MonthSelection::new(1, 1).unwrap();
        assert_eq!(first.prev(), first);
    }

    #[test]
    fn test_next_wraps_year() {
        let dec = MonthSelection::new(2025, 12).unwrap();
        let jan = dec.next();
        assert_eq!(jan, MonthSelection::new(2026, 1).unwrap());
    }

    #[test]
    fn test_prev_wraps_year() {
        let jan = MonthSelection::new(2026, 1).unwrap();
        let dec = jan.prev();
        assert_eq!(dec, MonthSelection::new(2025, 12).unwrap());
    }

    #[test]
    fn test_next_then_prev_is_identity() {
        let month = MonthSelection::new(2026, 8).unwrap();
        assert_eq!(month.next().prev(), month);
        assert_eq!(month.prev().next(), month);
    }

    #[test]
    fn test_month_bounds() {
        let march = MonthSelection::new(2026, 3).unwrap();
        assert_eq!(march.first_day().to_string(), "2026-03-01");
        assert_eq!(march.last_day().to_string(), "2026-03-31");

        // Leap year February
        let feb = MonthSelection::new(2024, 2).unwrap();
        assert_eq!(feb.last_day().to_string(), "2024-02-29");
    }

    #[test]
    fn test_contains() {
        let august = MonthSelection::new(2026, 8).unwrap();
        assert!(august.contains(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()));
        assert!(august.contains(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()));
        assert!(!august.contains(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()));
    }

    #[test]
    fn test_parse_and_display() {
        let month: MonthSelection = "2026-08".parse().unwrap();
        assert_eq!(month, MonthSelection::new(2026, 8).unwrap());
        assert_eq!(month.to_string(), "2026-08");

        assert!("2026".parse::<MonthSelection>().is_err());
        assert!("2026-13".parse::<MonthSelection>().is_err());
        assert!("aug-2026".parse::<MonthSelection>().is_err());
        // Years beyond the YYYY-MM format are rejected at parse time
        // rather than blowing up in date arithmetic later
        assert!("999999-01".parse::<MonthSelection>().is_err());
        assert!("0000-05".parse::<MonthSelection>().is_err());
    }
}
