//! Technical indicators over daily bars.
//!
//! Every calculation takes bars oldest-first (see [`PriceSeries::chronological`])
//! and returns one [`IndicatorPoint`] per input bar in the same order. Points
//! inside the warmup window are marked `valid: false`. Use
//! [`IndicatorSeries::recent`] to read the output back with recency addressing.
//!
//! [`PriceSeries::chronological`]: crate::domain::price_series::PriceSeries::chronological

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::calculate_atr;
pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_default};
pub use rsi::calculate_rsi;

use crate::domain::bar::DailyBar;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl IndicatorType {
    /// Bars needed before the first valid point.
    pub fn min_bars(&self) -> usize {
        match self {
            IndicatorType::Ema(period) | IndicatorType::Atr(period) => *period,
            IndicatorType::Rsi(period) => period + 1,
            IndicatorType::Macd { slow, signal, .. } => slow + signal - 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Point `offset` bars back from the latest (0 = latest bar).
    pub fn recent(&self, offset: usize) -> Option<&IndicatorPoint> {
        self.values
            .len()
            .checked_sub(offset + 1)
            .and_then(|i| self.values.get(i))
    }

    /// Latest simple value, if the latest point is out of warmup.
    pub fn latest_simple(&self) -> Option<f64> {
        match self.recent(0) {
            Some(IndicatorPoint {
                valid: true,
                value: IndicatorValue::Simple(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    /// Latest (line, signal) pair, if the latest point is out of warmup.
    pub fn latest_macd(&self) -> Option<(f64, f64)> {
        match self.recent(0) {
            Some(IndicatorPoint {
                valid: true,
                value: IndicatorValue::Macd { line, signal, .. },
                ..
            }) => Some((*line, *signal)),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

pub(crate) fn invalid_point(bar: &DailyBar) -> IndicatorPoint {
    IndicatorPoint {
        date: bar.date,
        valid: false,
        value: IndicatorValue::Simple(0.0),
    }
}

pub(crate) fn debug_assert_chronological(bars: &[DailyBar]) {
    debug_assert!(
        bars.windows(2).all(|w| w[0].date < w[1].date),
        "indicator input must be oldest-first"
    );
}
