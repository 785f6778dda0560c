//! Market data port: price history and fundamentals per symbol.

use crate::domain::bar::DailyBar;
use crate::domain::error::ScanError;
use crate::domain::fundamentals::Fundamentals;
use chrono::NaiveDate;

/// What the source knows about one symbol.
///
/// `bars` are most-recent-first, the order feeds deliver them in. An empty
/// `bars` is a valid (if useless) answer and differs from `None` returned by
/// [`MarketDataPort::fetch`], which means the source has nothing at all.
#[derive(Debug, Clone, Default)]
pub struct SymbolData {
    pub bars: Vec<DailyBar>,
    pub fundamentals: Fundamentals,
}

pub trait MarketDataPort {
    /// `Ok(None)` when the symbol is unknown to the source, `Err` when the
    /// source itself failed.
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<SymbolData>, ScanError>;
}
