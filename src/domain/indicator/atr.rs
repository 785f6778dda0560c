//! ATR (Average True Range) as a rolling mean of true range.
//!
//! TR[0] = high - low (no previous close), TR[i] = bar.true_range(close[i-1]).
//! ATR[i] = mean(TR[i-n+1..=i]).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::bar::DailyBar;
use crate::domain::indicator::{
    debug_assert_chronological, invalid_point, IndicatorPoint, IndicatorSeries, IndicatorType,
    IndicatorValue,
};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[DailyBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Atr(period),
            values: bars.iter().map(invalid_point).collect(),
        };
    }
    debug_assert_chronological(bars);

    let tr_values: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match i {
            0 => bar.high - bar.low,
            _ => bar.true_range(bars[i - 1].close),
        })
        .collect();

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i + 1 < period {
                return invalid_point(bar);
            }
            let window = &tr_values[i + 1 - period..=i];
            IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(window.iter().sum::<f64>() / period as f64),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    }
}
