//! Price history with an explicit orientation contract.
//!
//! Data feeds deliver bars most-recent-first. Windowed indicator maths needs
//! them oldest-first. `PriceSeries` accepts either orientation at the boundary,
//! rejects anything out of order, and stores bars chronologically. Callers
//! address bars by recency through [`PriceSeries::recent`] where offset 0 is
//! the latest bar.

use crate::domain::bar::DailyBar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrientationError {
    #[error("bar {index} ({date}) breaks most-recent-first order")]
    NotRecentFirst { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) breaks chronological order")]
    NotChronological { index: usize, date: NaiveDate },
}

#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: Vec<DailyBar>,
}

impl PriceSeries {
    /// Build from a feed that lists the newest bar first.
    pub fn from_recent_first(mut bars: Vec<DailyBar>) -> Result<Self, OrientationError> {
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date >= pair[0].date {
                return Err(OrientationError::NotRecentFirst {
                    index: i + 1,
                    date: pair[1].date,
                });
            }
        }
        bars.reverse();
        Ok(Self { bars })
    }

    /// Build from bars listed oldest first.
    pub fn from_chronological(bars: Vec<DailyBar>) -> Result<Self, OrientationError> {
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(OrientationError::NotChronological {
                    index: i + 1,
                    date: pair[1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars oldest-first, the order every indicator function expects.
    pub fn chronological(&self) -> &[DailyBar] {
        &self.bars
    }

    /// Bar `offset` sessions back from the latest (0 = latest).
    pub fn recent(&self, offset: usize) -> Option<&DailyBar> {
        self.bars
            .len()
            .checked_sub(offset + 1)
            .and_then(|i| self.bars.get(i))
    }

    pub fn latest(&self) -> Option<&DailyBar> {
        self.recent(0)
    }
}
