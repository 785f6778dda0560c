//! Append-only CSV trade ledger.
//!
//! One row per record: `date,symbol,entry,target,stop_loss,status`. Prices
//! are written at full precision; rounding happens when the recommendation is
//! built. The header is written when the file is first created. Each append opens the file in
//! append mode, writes a single row and flushes before returning.

use crate::domain::error::ScanError;
use crate::domain::trade::TradeRecord;
use crate::ports::ledger_port::LedgerPort;
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

pub const HEADER: [&str; 6] = ["date", "symbol", "entry", "target", "stop_loss", "status"];

pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn ledger_err(reason: String) -> ScanError {
    ScanError::Ledger { reason }
}

fn parse_record(record: &csv::StringRecord) -> Result<TradeRecord, ScanError> {
    let field = |idx: usize| {
        record
            .get(idx)
            .map(str::trim)
            .ok_or_else(|| ledger_err(format!("missing {} column", HEADER[idx])))
    };
    let price = |idx: usize| -> Result<f64, ScanError> {
        let raw = field(idx)?;
        raw.parse()
            .map_err(|e| ledger_err(format!("invalid {} '{}': {}", HEADER[idx], raw, e)))
    };

    Ok(TradeRecord {
        date: NaiveDate::parse_from_str(field(0)?, "%Y-%m-%d")
            .map_err(|e| ledger_err(format!("invalid date: {}", e)))?,
        symbol: field(1)?.to_string(),
        entry: price(2)?,
        target: price(3)?,
        stop_loss: price(4)?,
        status: field(5)?.parse().map_err(ledger_err)?,
    })
}

impl LedgerPort for CsvLedger {
    fn append(&self, record: &TradeRecord) -> Result<(), ScanError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            wtr.write_record(HEADER)
                .map_err(|e| ledger_err(e.to_string()))?;
        }
        wtr.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.symbol.clone(),
            record.entry.to_string(),
            record.target.to_string(),
            record.stop_loss.to_string(),
            record.status.to_string(),
        ])
        .map_err(|e| ledger_err(e.to_string()))?;
        wtr.flush()?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<TradeRecord>, ScanError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result.map_err(|e| ledger_err(format!("CSV parse error: {}", e)))?;
            records.push(parse_record(&row)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::TradeStatus;
    use tempfile::TempDir;

    fn record(symbol: &str, day: u32) -> TradeRecord {
        TradeRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            symbol: symbol.into(),
            entry: 101.5,
            target: 110.25,
            stop_loss: 96.0,
            status: TradeStatus::Open,
        }
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = CsvLedger::new(dir.path().join("trades.csv"));
        assert!(ledger.read_all().unwrap().is_empty());
    }

    #[test]
    fn append_then_read_in_order() {
        let dir = TempDir::new().unwrap();
        let ledger = CsvLedger::new(dir.path().join("trades.csv"));

        ledger.append(&record("TCS", 3)).unwrap();
        ledger.append(&record("INFY", 4)).unwrap();

        let records = ledger.read_all().unwrap();
        assert_eq!(records, vec![record("TCS", 3), record("INFY", 4)]);
    }

    #[test]
    fn header_written_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        let ledger = CsvLedger::new(path.clone());

        ledger.append(&record("TCS", 3)).unwrap();
        ledger.append(&record("TCS", 3)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date,symbol,entry,target,stop_loss,status");
        assert_eq!(lines[1], "2024-06-03,TCS,101.5,110.25,96,OPEN");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn three_decimal_prices_read_back_unchanged() {
        let dir = TempDir::new().unwrap();
        let ledger = CsvLedger::new(dir.path().join("trades.csv"));
        let precise = TradeRecord {
            entry: 12.345,
            target: 15.678,
            stop_loss: 10.001,
            ..record("TCS", 3)
        };

        ledger.append(&precise).unwrap();

        assert_eq!(ledger.read_all().unwrap(), vec![precise]);
    }

    #[test]
    fn duplicates_are_kept() {
        let dir = TempDir::new().unwrap();
        let ledger = CsvLedger::new(dir.path().join("trades.csv"));
        ledger.append(&record("TCS", 3)).unwrap();
        ledger.append(&record("TCS", 3)).unwrap();
        assert_eq!(ledger.read_all().unwrap().len(), 2);
    }

    #[test]
    fn creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let ledger = CsvLedger::new(dir.path().join("nested/ledger/trades.csv"));
        ledger.append(&record("TCS", 3)).unwrap();
        assert_eq!(ledger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_row_is_ledger_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        fs::write(
            &path,
            "date,symbol,entry,target,stop_loss,status\n2024-06-03,TCS,abc,1,1,OPEN\n",
        )
        .unwrap();
        let result = CsvLedger::new(path).read_all();
        assert!(matches!(result, Err(ScanError::Ledger { .. })));
    }
}
