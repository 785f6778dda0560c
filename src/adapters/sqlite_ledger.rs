//! SQLite trade ledger.

use crate::domain::error::ScanError;
use crate::domain::trade::TradeRecord;
use crate::ports::ledger_port::LedgerPort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;

pub struct SqliteLedger {
    pool: Pool<SqliteConnectionManager>,
}

fn ledger_err(e: impl std::fmt::Display) -> ScanError {
    ScanError::Ledger {
        reason: e.to_string(),
    }
}

impl SqliteLedger {
    /// Open (creating if needed) a ledger database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(2).build(manager).map_err(ledger_err)?;
        let ledger = Self { pool };
        ledger.initialize_schema()?;
        Ok(ledger)
    }

    pub fn in_memory() -> Result<Self, ScanError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(ledger_err)?;
        let ledger = Self { pool };
        ledger.initialize_schema()?;
        Ok(ledger)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, ScanError> {
        self.pool.get().map_err(ledger_err)
    }

    fn initialize_schema(&self) -> Result<(), ScanError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS trades (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL,
                    symbol TEXT NOT NULL,
                    entry REAL NOT NULL,
                    target REAL NOT NULL,
                    stop_loss REAL NOT NULL,
                    status TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_trades_date ON trades(date);",
            )
            .map_err(ledger_err)
    }
}

impl LedgerPort for SqliteLedger {
    fn append(&self, record: &TradeRecord) -> Result<(), ScanError> {
        self.conn()?
            .execute(
                "INSERT INTO trades (date, symbol, entry, target, stop_loss, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.date.format("%Y-%m-%d").to_string(),
                    record.symbol,
                    record.entry,
                    record.target,
                    record.stop_loss,
                    record.status.to_string(),
                ],
            )
            .map_err(ledger_err)?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<TradeRecord>, ScanError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT date, symbol, entry, target, stop_loss, status
                 FROM trades ORDER BY id ASC",
            )
            .map_err(ledger_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(ledger_err)?;

        let mut records = Vec::new();
        for row in rows {
            let (date, symbol, entry, target, stop_loss, status) = row.map_err(ledger_err)?;
            records.push(TradeRecord {
                date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(ledger_err)?,
                symbol,
                entry,
                target,
                stop_loss,
                status: status.parse().map_err(ledger_err)?,
            });
        }
        Ok(records)
    }
}
