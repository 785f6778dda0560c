//! Typed scan configuration and its validation.
//!
//! Everything the orchestrator needs is carried in [`ScanConfig`], built once
//! at startup and passed in explicitly.

use crate::domain::calendar::{parse_holidays, parse_weekday, MarketCalendar, DEFAULT_REPORT_DAY};
use crate::domain::candidate::{Evaluator, IndicatorPeriods};
use crate::domain::error::ScanError;
use crate::domain::fundamentals::{FundamentalsFilter, DEFAULT_MARKET_CAP_CEILING};
use crate::domain::recommendation::{
    TradeSizing, DEFAULT_PRICE_DECIMALS, DEFAULT_STOP_ATR_MULTIPLE, DEFAULT_TARGET_ATR_MULTIPLE,
};
use crate::domain::scoring::{
    ScoringRules, ACCEPT_THRESHOLD, DEFAULT_DEBT_TO_EQUITY_MAX, DEFAULT_PROFIT_MARGIN_MIN,
    DEFAULT_ROE_MIN, DEFAULT_RSI_OVERSOLD, MAX_SCORE,
};
use crate::domain::universe::Universe;
use crate::ports::config_port::ConfigPort;
use std::time::Duration;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_SYMBOL_TIMEOUT_SECS: i64 = 30;
const MAX_PRICE_DECIMALS: i64 = 6;
/// A century; anything longer overflows the date arithmetic.
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;
/// Calendar-day allowance for exchange holidays on top of weekends.
const HOLIDAY_MARGIN_DAYS: i64 = 7;

/// Calendar days needed for a daily feed to deliver `bars` trading days:
/// five trading days per seven calendar days, plus a week of holidays.
pub fn min_lookback_days(bars: usize) -> i64 {
    (bars * 7).div_ceil(5) as i64 + HOLIDAY_MARGIN_DAYS
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub universe: Universe,
    pub lookback_days: i64,
    pub top_k: usize,
    pub symbol_timeout: Duration,
    pub evaluator: Evaluator,
    pub sizing: TradeSizing,
    pub calendar: MarketCalendar,
}

impl ScanConfig {
    /// Defaults for everything but the universe.
    pub fn with_universe(universe: Universe) -> Self {
        Self {
            universe,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            top_k: DEFAULT_TOP_K,
            symbol_timeout: Duration::from_secs(DEFAULT_SYMBOL_TIMEOUT_SECS as u64),
            evaluator: Evaluator::default(),
            sizing: TradeSizing::default(),
            calendar: MarketCalendar::default(),
        }
    }

    /// Read a validated config. Call [`validate_scan_config`] first.
    pub fn from_config(config: &dyn ConfigPort, universe: Universe) -> Result<Self, ScanError> {
        let periods = IndicatorPeriods {
            rsi: config.get_int("scoring", "rsi_period", 14) as usize,
            atr: config.get_int("scoring", "atr_period", 14) as usize,
            ..IndicatorPeriods::default()
        };
        let rules = ScoringRules {
            roe_min: config.get_double("scoring", "roe_min", DEFAULT_ROE_MIN),
            debt_to_equity_max: config.get_double(
                "scoring",
                "debt_to_equity_max",
                DEFAULT_DEBT_TO_EQUITY_MAX,
            ),
            profit_margin_min: config.get_double(
                "scoring",
                "profit_margin_min",
                DEFAULT_PROFIT_MARGIN_MIN,
            ),
            rsi_oversold: config.get_double("scoring", "rsi_oversold", DEFAULT_RSI_OVERSOLD),
            accept_threshold: config.get_int("scoring", "accept_threshold", ACCEPT_THRESHOLD as i64)
                as u32,
        };
        let filter = FundamentalsFilter::new(config.get_double(
            "scan",
            "market_cap_ceiling",
            DEFAULT_MARKET_CAP_CEILING,
        ));

        let sizing = TradeSizing {
            target_atr_multiple: config.get_double(
                "trade",
                "target_atr_multiple",
                DEFAULT_TARGET_ATR_MULTIPLE,
            ),
            stop_atr_multiple: config.get_double(
                "trade",
                "stop_atr_multiple",
                DEFAULT_STOP_ATR_MULTIPLE,
            ),
            price_decimals: config.get_int("trade", "price_decimals", DEFAULT_PRICE_DECIMALS as i64)
                as u32,
        };

        Ok(Self {
            universe,
            lookback_days: config.get_int("scan", "lookback_days", DEFAULT_LOOKBACK_DAYS),
            top_k: config.get_int("scan", "top_k", DEFAULT_TOP_K as i64) as usize,
            symbol_timeout: Duration::from_secs(config.get_int(
                "scan",
                "symbol_timeout_secs",
                DEFAULT_SYMBOL_TIMEOUT_SECS,
            ) as u64),
            evaluator: Evaluator {
                filter,
                periods,
                rules,
            },
            sizing,
            calendar: read_calendar(config)?,
        })
    }
}

fn read_calendar(config: &dyn ConfigPort) -> Result<MarketCalendar, ScanError> {
    let holidays = match config.get_nonempty("calendar", "holidays") {
        Some(list) => parse_holidays(&list)
            .map_err(|e| ScanError::invalid("calendar", "holidays", e.to_string()))?,
        None => Default::default(),
    };
    let report_day = match config.get_nonempty("calendar", "report_day") {
        Some(day) => parse_weekday(&day)
            .map_err(|e| ScanError::invalid("calendar", "report_day", e.to_string()))?,
        None => DEFAULT_REPORT_DAY,
    };
    Ok(MarketCalendar::new(holidays, report_day))
}

pub fn validate_scan_config(config: &dyn ConfigPort) -> Result<(), ScanError> {
    validate_universe_source(config)?;
    validate_top_k(config)?;
    validate_periods(config)?;
    validate_lookback(config)?;
    validate_timeout(config)?;
    validate_ceiling(config)?;
    validate_threshold(config)?;
    validate_sizing(config)?;
    read_calendar(config)?;
    Ok(())
}

fn validate_universe_source(config: &dyn ConfigPort) -> Result<(), ScanError> {
    if config.get_nonempty("scan", "symbols").is_none()
        && config.get_nonempty("scan", "symbols_file").is_none()
    {
        return Err(ScanError::missing("scan", "symbols"));
    }
    Ok(())
}

fn validate_top_k(config: &dyn ConfigPort) -> Result<(), ScanError> {
    if config.get_int("scan", "top_k", DEFAULT_TOP_K as i64) < 1 {
        return Err(ScanError::invalid("scan", "top_k", "top_k must be at least 1"));
    }
    Ok(())
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), ScanError> {
    for key in ["rsi_period", "atr_period"] {
        if config.get_int("scoring", key, 14) < 1 {
            return Err(ScanError::invalid("scoring", key, "period must be at least 1"));
        }
    }
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let periods = IndicatorPeriods {
        rsi: config.get_int("scoring", "rsi_period", 14) as usize,
        atr: config.get_int("scoring", "atr_period", 14) as usize,
        ..IndicatorPeriods::default()
    };
    let bars = periods.min_bars();
    let minimum = min_lookback_days(bars);
    let value = config.get_int("scan", "lookback_days", DEFAULT_LOOKBACK_DAYS);
    if value < minimum {
        return Err(ScanError::invalid(
            "scan",
            "lookback_days",
            format!(
                "lookback_days must be at least {} calendar days to yield {} trading bars",
                minimum, bars
            ),
        ));
    }
    if value > MAX_LOOKBACK_DAYS {
        return Err(ScanError::invalid(
            "scan",
            "lookback_days",
            format!("lookback_days must not exceed {}", MAX_LOOKBACK_DAYS),
        ));
    }
    Ok(())
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), ScanError> {
    if config.get_int("scan", "symbol_timeout_secs", DEFAULT_SYMBOL_TIMEOUT_SECS) < 1 {
        return Err(ScanError::invalid(
            "scan",
            "symbol_timeout_secs",
            "symbol_timeout_secs must be positive",
        ));
    }
    Ok(())
}

fn validate_ceiling(config: &dyn ConfigPort) -> Result<(), ScanError> {
    if config.get_double("scan", "market_cap_ceiling", DEFAULT_MARKET_CAP_CEILING) <= 0.0 {
        return Err(ScanError::invalid(
            "scan",
            "market_cap_ceiling",
            "market_cap_ceiling must be positive",
        ));
    }
    Ok(())
}

fn validate_threshold(config: &dyn ConfigPort) -> Result<(), ScanError> {
    let value = config.get_int("scoring", "accept_threshold", ACCEPT_THRESHOLD as i64);
    if value < 1 || value > MAX_SCORE as i64 {
        return Err(ScanError::invalid(
            "scoring",
            "accept_threshold",
            format!("accept_threshold must be between 1 and {}", MAX_SCORE),
        ));
    }
    Ok(())
}

fn validate_sizing(config: &dyn ConfigPort) -> Result<(), ScanError> {
    for (key, default) in [
        ("target_atr_multiple", DEFAULT_TARGET_ATR_MULTIPLE),
        ("stop_atr_multiple", DEFAULT_STOP_ATR_MULTIPLE),
    ] {
        if config.get_double("trade", key, default) <= 0.0 {
            return Err(ScanError::invalid("trade", key, format!("{} must be positive", key)));
        }
    }
    let decimals = config.get_int("trade", "price_decimals", DEFAULT_PRICE_DECIMALS as i64);
    if !(0..=MAX_PRICE_DECIMALS).contains(&decimals) {
        return Err(ScanError::invalid(
            "trade",
            "price_decimals",
            format!("price_decimals must be between 0 and {}", MAX_PRICE_DECIMALS),
        ));
    }
    Ok(())
}
