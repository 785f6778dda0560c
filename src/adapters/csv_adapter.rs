//! CSV file market data adapter.
//!
//! Layout under the data directory:
//! - `<SYMBOL>.csv` with a header containing at least `date,high,low,close`
//!   (any extra columns such as `open` or `volume` are ignored, header names
//!   are case-insensitive, rows may be in any order).
//! - `fundamentals.csv` with `symbol,market_cap,return_on_equity,
//!   debt_to_equity,profit_margin`; blank cells are absent ratios.

use crate::domain::bar::DailyBar;
use crate::domain::error::ScanError;
use crate::domain::fundamentals::Fundamentals;
use crate::ports::data_port::{MarketDataPort, SymbolData};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const FUNDAMENTALS_FILE: &str = "fundamentals.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
    fundamentals: HashMap<String, Fundamentals>,
}

impl CsvAdapter {
    /// Open a data directory, loading `fundamentals.csv` if present.
    pub fn open(base_path: PathBuf) -> Result<Self, ScanError> {
        let fundamentals_path = base_path.join(FUNDAMENTALS_FILE);
        let fundamentals = if fundamentals_path.exists() {
            load_fundamentals(&fundamentals_path)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            base_path,
            fundamentals,
        })
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_err(reason: String) -> ScanError {
    ScanError::Data { reason }
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn required_column(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize, ScanError> {
    column(headers, name)
        .ok_or_else(|| data_err(format!("{}: missing {} column", path.display(), name)))
}

fn parse_field(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, ScanError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| data_err(format!("missing {} value", name)))?;
    raw.trim()
        .parse()
        .map_err(|e| data_err(format!("invalid {} value '{}': {}", name, raw, e)))
}

fn parse_optional(record: &csv::StringRecord, idx: Option<usize>) -> Option<f64> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn load_fundamentals(path: &Path) -> Result<HashMap<String, Fundamentals>, ScanError> {
    let content = fs::read_to_string(path)
        .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| data_err(format!("CSV parse error: {}", e)))?
        .clone();

    let symbol_idx = required_column(&headers, "symbol", path)?;
    let cap_idx = column(&headers, "market_cap");
    let roe_idx = column(&headers, "return_on_equity");
    let de_idx = column(&headers, "debt_to_equity");
    let pm_idx = column(&headers, "profit_margin");

    let mut out = HashMap::new();
    for result in rdr.records() {
        let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;
        let Some(symbol) = record.get(symbol_idx).map(str::trim).filter(|s| !s.is_empty())
        else {
            continue;
        };
        out.insert(
            symbol.to_uppercase(),
            Fundamentals {
                market_cap: parse_optional(&record, cap_idx),
                return_on_equity: parse_optional(&record, roe_idx),
                debt_to_equity: parse_optional(&record, de_idx),
                profit_margin: parse_optional(&record, pm_idx),
            },
        );
    }
    Ok(out)
}

impl MarketDataPort for CsvAdapter {
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<SymbolData>, ScanError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| data_err(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_err(format!("CSV parse error: {}", e)))?
            .clone();
        let date_idx = required_column(&headers, "date", &path)?;
        let high_idx = required_column(&headers, "high", &path)?;
        let low_idx = required_column(&headers, "low", &path)?;
        let close_idx = required_column(&headers, "close", &path)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_idx)
                .ok_or_else(|| data_err("missing date value".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| data_err(format!("invalid date format: {}", e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(DailyBar {
                date,
                high: parse_field(&record, high_idx, "high")?,
                low: parse_field(&record, low_idx, "low")?,
                close: parse_field(&record, close_idx, "close")?,
            });
        }

        // feed contract: newest first
        bars.sort_by(|a, b| b.date.cmp(&a.date));
        bars.dedup_by_key(|b| b.date);

        Ok(Some(SymbolData {
            bars,
            fundamentals: self
                .fundamentals
                .get(&symbol.to_uppercase())
                .cloned()
                .unwrap_or_default(),
        }))
    }
}
