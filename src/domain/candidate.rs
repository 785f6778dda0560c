//! Per-symbol evaluation: market-cap gate, indicators, score, decision.

use crate::domain::error::ScanError;
use crate::domain::fundamentals::{FilterRejection, Fundamentals, FundamentalsFilter};
use crate::domain::indicator::{calculate_atr, calculate_macd, calculate_rsi, IndicatorType};
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::price_series::PriceSeries;
use crate::domain::scoring::{Decision, IndicatorSnapshot, ScoreCard, ScoringRules};
use chrono::NaiveDate;
use std::fmt;

/// Why a symbol produced no candidate this run.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Unavailable,
    FetchFailed(String),
    Timeout { elapsed_ms: u128 },
    WindowOutOfRange { lookback_days: i64 },
    BadOrientation(String),
    InsufficientHistory { bars: usize, minimum: usize },
    Filtered(FilterRejection),
    IndicatorUndefined(IndicatorType),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unavailable => write!(f, "data unavailable"),
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {}", reason),
            SkipReason::Timeout { elapsed_ms } => write!(f, "timed out after {}ms", elapsed_ms),
            SkipReason::WindowOutOfRange { lookback_days } => {
                write!(f, "lookback of {} days is outside the calendar", lookback_days)
            }
            SkipReason::BadOrientation(reason) => write!(f, "unordered history: {}", reason),
            SkipReason::InsufficientHistory { bars, minimum } => {
                write!(f, "only {} bars, minimum {} required", bars, minimum)
            }
            SkipReason::Filtered(rejection) => write!(f, "{}", rejection),
            SkipReason::IndicatorUndefined(kind) => write!(f, "{} undefined", kind),
        }
    }
}

impl SkipReason {
    /// Run-level error for callers that treat a skip as fatal (single-symbol scoring).
    pub fn into_error(self, symbol: &str) -> ScanError {
        match self {
            SkipReason::Unavailable => ScanError::NoData {
                symbol: symbol.to_string(),
            },
            SkipReason::InsufficientHistory { bars, minimum } => ScanError::InsufficientData {
                symbol: symbol.to_string(),
                bars,
                minimum,
            },
            other => ScanError::Data {
                reason: format!("{}: {}", symbol, other),
            },
        }
    }
}

/// Indicator periods used when evaluating a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPeriods {
    pub rsi: usize,
    pub atr: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            rsi: crate::domain::indicator::rsi::DEFAULT_PERIOD,
            atr: crate::domain::indicator::atr::DEFAULT_PERIOD,
            macd_fast: DEFAULT_FAST,
            macd_slow: DEFAULT_SLOW,
            macd_signal: DEFAULT_SIGNAL,
        }
    }
}

impl IndicatorPeriods {
    fn indicator_types(&self) -> [IndicatorType; 3] {
        [
            IndicatorType::Rsi(self.rsi),
            IndicatorType::Atr(self.atr),
            IndicatorType::Macd {
                fast: self.macd_fast,
                slow: self.macd_slow,
                signal: self.macd_signal,
            },
        ]
    }

    /// Shortest history for which every indicator has a latest value.
    pub fn min_bars(&self) -> usize {
        self.indicator_types()
            .iter()
            .map(IndicatorType::min_bars)
            .max()
            .unwrap_or(0)
    }

    /// Compute latest-bar readings from an oldest-first series.
    pub fn snapshot(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, SkipReason> {
        let bars = series.chronological();
        let [rsi_type, atr_type, macd_type] = self.indicator_types();

        let rsi = calculate_rsi(bars, self.rsi)
            .latest_simple()
            .ok_or(SkipReason::IndicatorUndefined(rsi_type))?;
        let atr = calculate_atr(bars, self.atr)
            .latest_simple()
            .ok_or(SkipReason::IndicatorUndefined(atr_type))?;
        let (macd_line, macd_signal) =
            calculate_macd(bars, self.macd_fast, self.macd_slow, self.macd_signal)
                .latest_macd()
                .ok_or(SkipReason::IndicatorUndefined(macd_type))?;

        Ok(IndicatorSnapshot {
            rsi,
            atr,
            macd_line,
            macd_signal,
        })
    }
}

/// A symbol's full evaluation for one run. Never persisted.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub latest_price: f64,
    pub indicators: IndicatorSnapshot,
    pub fundamentals: Fundamentals,
    pub score: ScoreCard,
    pub decision: Decision,
}

impl Candidate {
    pub fn is_accepted(&self) -> bool {
        self.decision == Decision::Accept
    }
}

/// Everything `evaluate` needs besides the data itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    pub filter: FundamentalsFilter,
    pub periods: IndicatorPeriods,
    pub rules: ScoringRules,
}

impl Evaluator {
    /// The market-cap gate runs first; a filtered symbol never reaches
    /// indicator computation or scoring.
    pub fn evaluate(
        &self,
        symbol: &str,
        series: &PriceSeries,
        fundamentals: Fundamentals,
    ) -> Result<Candidate, SkipReason> {
        self.filter
            .check(&fundamentals)
            .map_err(SkipReason::Filtered)?;

        let minimum = self.periods.min_bars();
        let latest = match series.latest() {
            Some(bar) if series.len() >= minimum => bar,
            _ => {
                return Err(SkipReason::InsufficientHistory {
                    bars: series.len(),
                    minimum,
                });
            }
        };

        let indicators = self.periods.snapshot(series)?;
        let score = self.rules.score(&indicators, &fundamentals);
        let decision = self.rules.decide(&score);

        Ok(Candidate {
            symbol: symbol.to_string(),
            as_of: latest.date,
            latest_price: latest.close,
            indicators,
            fundamentals,
            score,
            decision,
        })
    }
}
