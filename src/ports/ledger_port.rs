//! Append-only trade ledger port.

use crate::domain::error::ScanError;
use crate::domain::trade::TradeRecord;

pub trait LedgerPort {
    /// Append one record. No uniqueness constraint.
    fn append(&self, record: &TradeRecord) -> Result<(), ScanError>;

    /// Every record in append order. A store that does not exist yet
    /// reads as empty.
    fn read_all(&self) -> Result<Vec<TradeRecord>, ScanError>;
}
