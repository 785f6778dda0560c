//! RSI (Relative Strength Index) over a rolling window.
//!
//! avg_gain and avg_loss are plain means of the last n per-bar gains and
//! losses (not Wilder-smoothed).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are invalid (need n price changes).

use crate::domain::bar::DailyBar;
use crate::domain::indicator::{
    debug_assert_chronological, invalid_point, IndicatorPoint, IndicatorSeries, IndicatorType,
    IndicatorValue,
};

pub const DEFAULT_PERIOD: usize = 14;
pub const RSI_CEILING: f64 = 100.0;

pub fn calculate_rsi(bars: &[DailyBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: bars.iter().map(invalid_point).collect(),
        };
    }
    debug_assert_chronological(bars);

    let mut gains = Vec::with_capacity(bars.len() - 1);
    let mut losses = Vec::with_capacity(bars.len() - 1);
    for pair in bars.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut values = Vec::with_capacity(bars.len());
    values.push(invalid_point(&bars[0]));

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;

    for (i, bar) in bars.iter().enumerate().skip(1) {
        let delta_idx = i - 1;
        gain_sum += gains[delta_idx];
        loss_sum += losses[delta_idx];
        if delta_idx >= period {
            gain_sum -= gains[delta_idx - period];
            loss_sum -= losses[delta_idx - period];
        }

        if i < period {
            values.push(invalid_point(bar));
            continue;
        }

        let avg_gain = gain_sum.max(0.0) / period as f64;
        let avg_loss = loss_sum.max(0.0) / period as f64;
        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(rsi_from_averages(avg_gain, avg_loss)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    // Running sums can leave a loss residue around 1e-15 after a losing bar
    // rolls out of the window; treat that as zero rather than a tiny divisor.
    if avg_loss <= f64::EPSILON * avg_gain.max(1.0) {
        return RSI_CEILING;
    }
    (RSI_CEILING - RSI_CEILING / (1.0 + avg_gain / avg_loss)).clamp(0.0, RSI_CEILING)
}
