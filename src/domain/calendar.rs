//! Market calendar: holidays, weekends and the weekly report day.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

pub const DEFAULT_REPORT_DAY: Weekday = Weekday::Sat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Exchange holiday: no scan, holiday notice only.
    Holiday,
    /// Weekly report day: no scan, ledger summary instead.
    WeeklyReport,
    /// Weekend day that is not the report day.
    Weekend,
    Trading,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid holiday date '{0}' (expected YYYY-MM-DD)")]
    BadDate(String),

    #[error("invalid weekday '{0}'")]
    BadWeekday(String),
}

#[derive(Debug, Clone)]
pub struct MarketCalendar {
    holidays: BTreeSet<NaiveDate>,
    report_day: Weekday,
}

impl Default for MarketCalendar {
    fn default() -> Self {
        Self {
            holidays: BTreeSet::new(),
            report_day: DEFAULT_REPORT_DAY,
        }
    }
}

impl MarketCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>, report_day: Weekday) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            report_day,
        }
    }

    pub fn report_day(&self) -> Weekday {
        self.report_day
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Holidays win over the report day, which wins over the weekend.
    pub fn classify(&self, date: NaiveDate) -> RunMode {
        if self.is_holiday(date) {
            RunMode::Holiday
        } else if date.weekday() == self.report_day {
            RunMode::WeeklyReport
        } else if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            RunMode::Weekend
        } else {
            RunMode::Trading
        }
    }
}

/// Parse a comma-separated list of YYYY-MM-DD dates. Blank input is empty.
pub fn parse_holidays(input: &str) -> Result<BTreeSet<NaiveDate>, CalendarError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CalendarError::BadDate(s.into()))
        })
        .collect()
}

pub fn parse_weekday(input: &str) -> Result<Weekday, CalendarError> {
    input
        .trim()
        .parse::<Weekday>()
        .map_err(|_| CalendarError::BadWeekday(input.trim().to_string()))
}
