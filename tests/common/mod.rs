#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
pub use swingscan::domain::bar::DailyBar;
use swingscan::domain::error::ScanError;
pub use swingscan::domain::fundamentals::Fundamentals;
use swingscan::domain::scan_config::ScanConfig;
use swingscan::domain::trade::TradeRecord;
use swingscan::domain::universe::parse_symbols;
use swingscan::ports::data_port::{MarketDataPort, SymbolData};
use swingscan::ports::ledger_port::LedgerPort;
use swingscan::ports::notify_port::NotifyPort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, SymbolData>,
    pub errors: HashMap<String, String>,
    pub fetch_calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetch_calls: Cell::new(0),
        }
    }

    /// `bars` are most-recent-first, as a feed would deliver them.
    pub fn with_symbol(mut self, symbol: &str, bars: Vec<DailyBar>, fundamentals: Fundamentals) -> Self {
        self.data
            .insert(symbol.to_string(), SymbolData { bars, fundamentals });
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch(
        &self,
        symbol: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Option<SymbolData>, ScanError> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScanError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }
}

impl NotifyPort for RecordingNotifier {
    fn send(&self, text: &str) -> Result<(), ScanError> {
        if self.fail {
            return Err(ScanError::Notify {
                reason: "channel down".into(),
            });
        }
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryLedger {
    pub records: RefCell<Vec<TradeRecord>>,
    pub fail_appends: bool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<TradeRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            fail_appends: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
            fail_appends: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }
}

impl LedgerPort for MemoryLedger {
    fn append(&self, record: &TradeRecord) -> Result<(), ScanError> {
        if self.fail_appends {
            return Err(ScanError::Ledger {
                reason: "disk full".into(),
            });
        }
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<TradeRecord>, ScanError> {
        Ok(self.records.borrow().clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Wednesday; not a weekend or default report day.
pub fn trading_day() -> NaiveDate {
    date(2024, 6, 5)
}

/// Bars ending on `last`, one per calendar day, returned most-recent-first.
/// High and low sit one unit either side of the close.
pub fn bars_from_closes(closes: &[f64], last: NaiveDate) -> Vec<DailyBar> {
    let n = closes.len() as i64;
    let mut bars: Vec<DailyBar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            DailyBar::new(last - Duration::days(n - 1 - i as i64), close + 1.0, close - 1.0, close)
        })
        .collect();
    bars.reverse();
    bars
}

/// A steep slide that decelerates: every recent change is a loss (RSI 0)
/// while the slowing decline lifts the MACD line above its signal. The last
/// fourteen true ranges are all 2.0, so ATR is 2.0 and the close is 78.
pub fn oversold_turning_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..60).map(|i| 200.0 - 2.0 * i as f64).collect();
    closes.extend((1..=20).map(|j| 82.0 - 0.2 * j as f64));
    closes
}

/// Steady climb: RSI pinned at 100, never scores momentum points.
pub fn rising_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 50.0 + i as f64).collect()
}

pub fn oversold_bars(last: NaiveDate) -> Vec<DailyBar> {
    bars_from_closes(&oversold_turning_closes(), last)
}

pub fn quality_fundamentals() -> Fundamentals {
    Fundamentals {
        market_cap: Some(5_000.0),
        return_on_equity: Some(0.20),
        debt_to_equity: Some(0.30),
        profit_margin: Some(0.12),
    }
}

/// Passes the cap gate but satisfies no ratio rule.
pub fn weak_fundamentals() -> Fundamentals {
    Fundamentals {
        market_cap: Some(2_000.0),
        return_on_equity: Some(0.05),
        debt_to_equity: Some(1.2),
        profit_margin: Some(0.02),
    }
}

pub fn scan_config(symbols: &str) -> ScanConfig {
    ScanConfig::with_universe(parse_symbols(symbols).unwrap())
}

impl MemoryLedger {
    pub fn read_all_records(&self) -> Vec<TradeRecord> {
        self.records.borrow().clone()
    }
}
