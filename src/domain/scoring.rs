//! Point-based scoring of a candidate.
//!
//! | rule                                  | points |
//! |---------------------------------------|--------|
//! | return on equity > roe_min            | 10     |
//! | debt to equity < debt_to_equity_max   | 10     |
//! | profit margin > profit_margin_min     | 10     |
//! | RSI < rsi_oversold and MACD > signal  | 20     |
//!
//! A rule whose ratio is absent contributes nothing; absence is not failure.

use crate::domain::fundamentals::Fundamentals;
use std::fmt;

pub const FUNDAMENTAL_POINTS: u32 = 10;
pub const MOMENTUM_POINTS: u32 = 20;
pub const MAX_SCORE: u32 = 3 * FUNDAMENTAL_POINTS + MOMENTUM_POINTS;
pub const ACCEPT_THRESHOLD: u32 = 30;

pub const DEFAULT_ROE_MIN: f64 = 0.15;
pub const DEFAULT_DEBT_TO_EQUITY_MAX: f64 = 0.5;
pub const DEFAULT_PROFIT_MARGIN_MIN: f64 = 0.10;
pub const DEFAULT_RSI_OVERSOLD: f64 = 35.0;

/// Latest-bar indicator readings a candidate is scored on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub atr: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
}

impl IndicatorSnapshot {
    pub fn macd_above_signal(&self) -> bool {
        self.macd_line > self.macd_signal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreRule {
    ReturnOnEquity,
    LowLeverage,
    ProfitMargin,
    OversoldMomentum,
}

impl ScoreRule {
    pub fn points(self) -> u32 {
        match self {
            ScoreRule::OversoldMomentum => MOMENTUM_POINTS,
            _ => FUNDAMENTAL_POINTS,
        }
    }
}

impl fmt::Display for ScoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreRule::ReturnOnEquity => "strong ROE",
            ScoreRule::LowLeverage => "low debt",
            ScoreRule::ProfitMargin => "healthy margin",
            ScoreRule::OversoldMomentum => "oversold with MACD crossover",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub total: u32,
    pub satisfied: Vec<ScoreRule>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub roe_min: f64,
    pub debt_to_equity_max: f64,
    pub profit_margin_min: f64,
    pub rsi_oversold: f64,
    pub accept_threshold: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            roe_min: DEFAULT_ROE_MIN,
            debt_to_equity_max: DEFAULT_DEBT_TO_EQUITY_MAX,
            profit_margin_min: DEFAULT_PROFIT_MARGIN_MIN,
            rsi_oversold: DEFAULT_RSI_OVERSOLD,
            accept_threshold: ACCEPT_THRESHOLD,
        }
    }
}

impl ScoringRules {
    pub fn score(&self, indicators: &IndicatorSnapshot, fundamentals: &Fundamentals) -> ScoreCard {
        let mut satisfied = Vec::with_capacity(4);

        if fundamentals
            .return_on_equity
            .is_some_and(|roe| roe > self.roe_min)
        {
            satisfied.push(ScoreRule::ReturnOnEquity);
        }
        if fundamentals
            .debt_to_equity
            .is_some_and(|de| de < self.debt_to_equity_max)
        {
            satisfied.push(ScoreRule::LowLeverage);
        }
        if fundamentals
            .profit_margin
            .is_some_and(|pm| pm > self.profit_margin_min)
        {
            satisfied.push(ScoreRule::ProfitMargin);
        }
        if indicators.rsi < self.rsi_oversold && indicators.macd_above_signal() {
            satisfied.push(ScoreRule::OversoldMomentum);
        }

        ScoreCard {
            total: satisfied.iter().map(|r| r.points()).sum(),
            satisfied,
        }
    }

    pub fn decide(&self, card: &ScoreCard) -> Decision {
        if card.total >= self.accept_threshold {
            Decision::Accept
        } else {
            Decision::Reject
        }
    }
}
