//! Fundamental ratios and the market-cap gate.

/// Default small/mid-cap ceiling, in the data source's currency units.
pub const DEFAULT_MARKET_CAP_CEILING: f64 = 10_000.0;

/// Sparse ratio snapshot. Any field may be missing from the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fundamentals {
    pub market_cap: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub profit_margin: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterRejection {
    #[error("market cap not reported")]
    MissingMarketCap,

    #[error("market cap {market_cap} above ceiling {ceiling}")]
    AboveCeiling { market_cap: f64, ceiling: f64 },
}

/// Hard gate applied before scoring: only small and mid caps pass.
#[derive(Debug, Clone, Copy)]
pub struct FundamentalsFilter {
    pub market_cap_ceiling: f64,
}

impl Default for FundamentalsFilter {
    fn default() -> Self {
        Self {
            market_cap_ceiling: DEFAULT_MARKET_CAP_CEILING,
        }
    }
}

impl FundamentalsFilter {
    pub fn new(market_cap_ceiling: f64) -> Self {
        Self { market_cap_ceiling }
    }

    /// A cap exactly at the ceiling passes.
    pub fn check(&self, fundamentals: &Fundamentals) -> Result<(), FilterRejection> {
        match fundamentals.market_cap {
            None => Err(FilterRejection::MissingMarketCap),
            Some(cap) if cap.is_nan() => Err(FilterRejection::MissingMarketCap),
            Some(cap) if cap > self.market_cap_ceiling => Err(FilterRejection::AboveCeiling {
                market_cap: cap,
                ceiling: self.market_cap_ceiling,
            }),
            Some(_) => Ok(()),
        }
    }
}
