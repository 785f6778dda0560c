//! Paper-trade records and the ledger report.

use crate::domain::recommendation::Recommendation;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Length of the weekly report window, inclusive of the report date.
pub const REPORT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Open => f.write_str("OPEN"),
        }
    }
}

impl FromStr for TradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "OPEN" => Ok(TradeStatus::Open),
            other => Err(format!("unknown trade status '{}'", other)),
        }
    }
}

/// One ledger row. Rows are never updated or deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub entry: f64,
    pub target: f64,
    pub stop_loss: f64,
    pub status: TradeStatus,
}

impl From<&Recommendation> for TradeRecord {
    fn from(rec: &Recommendation) -> Self {
        Self {
            date: rec.created,
            symbol: rec.symbol.clone(),
            entry: rec.entry,
            target: rec.target,
            stop_loss: rec.stop_loss,
            status: TradeStatus::Open,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total: usize,
    pub by_symbol: BTreeMap<String, usize>,
}

impl LedgerReport {
    /// Summarise records dated within `[period_start, period_end]`.
    pub fn for_period(records: &[TradeRecord], period_start: NaiveDate, period_end: NaiveDate) -> Self {
        let mut by_symbol = BTreeMap::new();
        let mut total = 0;
        for record in records
            .iter()
            .filter(|r| r.date >= period_start && r.date <= period_end)
        {
            total += 1;
            *by_symbol.entry(record.symbol.clone()).or_insert(0) += 1;
        }
        Self {
            period_start,
            period_end,
            total,
            by_symbol,
        }
    }

    /// The seven days ending on `report_date`.
    pub fn weekly(records: &[TradeRecord], report_date: NaiveDate) -> Self {
        let start = report_date - Duration::days(REPORT_WINDOW_DAYS - 1);
        Self::for_period(records, start, report_date)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
