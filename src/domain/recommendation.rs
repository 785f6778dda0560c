//! Priced trade recommendations built from accepted candidates.

use crate::domain::candidate::Candidate;
use chrono::NaiveDate;

pub const DEFAULT_TARGET_ATR_MULTIPLE: f64 = 1.8;
pub const DEFAULT_STOP_ATR_MULTIPLE: f64 = 1.0;
pub const DEFAULT_PRICE_DECIMALS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeSizing {
    pub target_atr_multiple: f64,
    pub stop_atr_multiple: f64,
    pub price_decimals: u32,
}

impl Default for TradeSizing {
    fn default() -> Self {
        Self {
            target_atr_multiple: DEFAULT_TARGET_ATR_MULTIPLE,
            stop_atr_multiple: DEFAULT_STOP_ATR_MULTIPLE,
            price_decimals: DEFAULT_PRICE_DECIMALS,
        }
    }
}

impl TradeSizing {
    pub fn round_price(&self, price: f64) -> f64 {
        let scale = 10f64.powi(self.price_decimals as i32);
        (price * scale).round() / scale
    }

    /// target = close + k_t * ATR, stop = close - k_s * ATR.
    /// Returns `None` for a rejected candidate.
    pub fn recommend(&self, candidate: &Candidate, created: NaiveDate) -> Option<Recommendation> {
        if !candidate.is_accepted() {
            return None;
        }
        let close = candidate.latest_price;
        let atr = candidate.indicators.atr;
        Some(Recommendation {
            symbol: candidate.symbol.clone(),
            entry: self.round_price(close),
            target: self.round_price(close + self.target_atr_multiple * atr),
            stop_loss: self.round_price(close - self.stop_atr_multiple * atr),
            score: candidate.score.total,
            rsi: candidate.indicators.rsi,
            atr,
            created,
            price_decimals: self.price_decimals,
        })
    }
}

/// An accepted candidate priced for entry. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub symbol: String,
    pub entry: f64,
    pub target: f64,
    pub stop_loss: f64,
    pub score: u32,
    pub rsi: f64,
    pub atr: f64,
    pub created: NaiveDate,
    /// Decimal places the prices were rounded to; used when rendering them.
    pub price_decimals: u32,
}
