//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::bar::DailyBar;
use crate::domain::indicator::{
    debug_assert_chronological, invalid_point, IndicatorPoint, IndicatorSeries, IndicatorType,
    IndicatorValue,
};

pub fn calculate_ema(bars: &[DailyBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }
    debug_assert_chronological(bars);

    let mut values = Vec::with_capacity(bars.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < period - 1 {
            sum += bar.close;
            values.push(invalid_point(bar));
            continue;
        }

        ema = if i == period - 1 {
            (sum + bar.close) / period as f64
        } else {
            bar.close * k + ema * (1.0 - k)
        };
        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(ema),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}
