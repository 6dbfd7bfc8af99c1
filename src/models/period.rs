use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FetchError, Result};
use crate::models::request::ProcessingLevel;
use crate::utils::constants::{DAY_WINDOW_HOURS, HUB_TIMESTAMP_FORMAT};

/// One day of L2 swath coverage: midnight UTC to 23:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        Self {
            start,
            end: start + Duration::hours(DAY_WINDOW_HOURS),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn start_iso(&self) -> String {
        self.start.format(HUB_TIMESTAMP_FORMAT).to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format(HUB_TIMESTAMP_FORMAT).to_string()
    }

    /// `YYYY-MM-DD`
    pub fn token(&self) -> String {
        self.date().format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(FetchError::InvalidRequest(format!(
                "Month must be between 1 and 12, got: {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// `YYYY-MM`
    pub fn token(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// `YYYYMM`, as used in TEMIS file names
    pub fn compact(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (year, month) = match trimmed.split_once('-') {
            Some(parts) => parts,
            None if trimmed.len() == 6 => trimmed.split_at(4),
            None => {
                return Err(FetchError::InvalidRequest(format!(
                    "Invalid month '{}'. Expected YYYY-MM",
                    s
                )))
            }
        };

        let year = year.parse::<i32>().map_err(|_| {
            FetchError::InvalidRequest(format!("Invalid year in '{}'", s))
        })?;
        let month = month.parse::<u32>().map_err(|_| {
            FetchError::InvalidRequest(format!("Invalid month in '{}'", s))
        })?;

        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodUnit {
    Day(DayWindow),
    Month(YearMonth),
}

impl PeriodUnit {
    pub fn token(&self) -> String {
        match self {
            PeriodUnit::Day(window) => window.token(),
            PeriodUnit::Month(month) => month.token(),
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodUnit::Day(window) => write!(f, "{} -> {}", window.start_iso(), window.end_iso()),
            PeriodUnit::Month(month) => write!(f, "{}", month),
        }
    }
}

/// Every calendar day in `[start, end]`
pub fn plan_days(start: NaiveDate, end: NaiveDate) -> Vec<DayWindow> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(DayWindow::for_date)
        .collect()
}

/// Distinct year-months covered by `[start, end]`, ascending
pub fn plan_months(start: NaiveDate, end: NaiveDate) -> Vec<YearMonth> {
    let mut months: Vec<YearMonth> = Vec::new();
    for day in start.iter_days().take_while(|day| *day <= end) {
        let month = YearMonth::of(day);
        if months.last() != Some(&month) {
            months.push(month);
        }
    }
    months
}

pub fn plan_periods(level: ProcessingLevel, start: NaiveDate, end: NaiveDate) -> Vec<PeriodUnit> {
    match level {
        ProcessingLevel::L2 => plan_days(start, end).into_iter().map(PeriodUnit::Day).collect(),
        ProcessingLevel::L3 => plan_months(start, end)
            .into_iter()
            .map(PeriodUnit::Month)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_window_per_day() {
        let windows = plan_days(date(2020, 2, 27), date(2020, 3, 2));
        assert_eq!(windows.len(), 5); // leap year

        for window in &windows {
            assert_eq!(window.end - window.start, Duration::hours(23));
        }

        assert_eq!(windows[0].start_iso(), "2020-02-27T00:00:00Z");
        assert_eq!(windows[0].end_iso(), "2020-02-27T23:00:00Z");
        assert_eq!(windows[2].token(), "2020-02-29");
        assert_eq!(windows[4].end_iso(), "2020-03-02T23:00:00Z");
    }

    #[test]
    fn test_single_day_range() {
        let windows = plan_days(date(2021, 6, 15), date(2021, 6, 15));
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].date(), date(2021, 6, 15));
    }

    #[test]
    fn test_reversed_range_is_empty() {
        assert!(plan_days(date(2021, 6, 15), date(2021, 6, 14)).is_empty());
        assert!(plan_months(date(2021, 6, 15), date(2021, 5, 14)).is_empty());
    }

    #[test]
    fn test_months_are_distinct_and_ordered() {
        let months = plan_months(date(2020, 11, 20), date(2021, 2, 3));
        let tokens: Vec<String> = months.iter().map(|m| m.token()).collect();
        assert_eq!(tokens, vec!["2020-11", "2020-12", "2021-01", "2021-02"]);
    }

    #[test]
    fn test_month_within_single_month() {
        let months = plan_months(date(2021, 5, 1), date(2021, 5, 31));
        assert_eq!(months, vec![YearMonth { year: 2021, month: 5 }]);
    }

    #[test]
    fn test_plan_periods_by_level() {
        let l2 = plan_periods(ProcessingLevel::L2, date(2021, 1, 30), date(2021, 2, 2));
        let l3 = plan_periods(ProcessingLevel::L3, date(2021, 1, 30), date(2021, 2, 2));

        assert_eq!(l2.len(), 4);
        assert!(matches!(l2[0], PeriodUnit::Day(_)));
        assert_eq!(l3.len(), 2);
        assert_eq!(l3[1].token(), "2021-02");
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!("2021-05".parse::<YearMonth>().unwrap().compact(), "202105");
        assert_eq!("202112".parse::<YearMonth>().unwrap().token(), "2021-12");
        assert!("2021-13".parse::<YearMonth>().is_err());
        assert!("May 2021".parse::<YearMonth>().is_err());
    }
}
