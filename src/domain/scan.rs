//! Daily scan orchestrator.
//!
//! One invocation ends in exactly one of two ways: the calendar says not to
//! scan (holiday, weekend or weekly report day), or every symbol in the
//! universe is evaluated, the accepted candidates are ranked and the top few
//! are notified and recorded. A symbol that cannot be evaluated is reported as
//! a [`SymbolOutcome::Skipped`] value and never aborts the run.

use crate::domain::calendar::RunMode;
use crate::domain::candidate::{Candidate, SkipReason};
use crate::domain::error::ScanError;
use crate::domain::message;
use crate::domain::price_series::PriceSeries;
use crate::domain::recommendation::Recommendation;
use crate::domain::scan_config::ScanConfig;
use crate::domain::trade::{LedgerReport, TradeRecord};
use crate::ports::data_port::MarketDataPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::notify_port::NotifyPort;
use chrono::{Duration, NaiveDate};
use std::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub enum SymbolOutcome {
    Evaluated(Candidate),
    Skipped { symbol: String, reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Holiday or weekend: one status notification, nothing fetched.
    MarketClosed(RunMode),
    WeeklyReport(LedgerReport),
    NoOpportunities {
        evaluated: usize,
        skipped: Vec<SkippedSymbol>,
    },
    Recommendations {
        picks: Vec<Recommendation>,
        skipped: Vec<SkippedSymbol>,
    },
}

/// Sort accepted candidates by score, highest first, and keep the top `k`.
/// Equal scores keep their scan order.
pub fn rank_candidates(mut candidates: Vec<Candidate>, k: usize) -> Vec<Candidate> {
    candidates.retain(Candidate::is_accepted);
    candidates.sort_by(|a, b| b.score.total.cmp(&a.score.total));
    candidates.truncate(k);
    candidates
}

/// Fetch and evaluate one symbol. Every failure becomes a skip.
pub fn evaluate_symbol(
    config: &ScanConfig,
    data: &dyn MarketDataPort,
    symbol: &str,
    today: NaiveDate,
) -> SymbolOutcome {
    let skip = |reason: SkipReason| {
        warn!(symbol, "skipping ({reason})");
        SymbolOutcome::Skipped {
            symbol: symbol.to_string(),
            reason,
        }
    };

    let Some(start) = Duration::try_days(config.lookback_days)
        .and_then(|window| today.checked_sub_signed(window))
    else {
        return skip(SkipReason::WindowOutOfRange {
            lookback_days: config.lookback_days,
        });
    };
    let started = Instant::now();
    let fetched = match data.fetch(symbol, start, today) {
        Ok(Some(fetched)) => fetched,
        Ok(None) => return skip(SkipReason::Unavailable),
        Err(e) => return skip(SkipReason::FetchFailed(e.to_string())),
    };

    let elapsed = started.elapsed();
    if elapsed > config.symbol_timeout {
        return skip(SkipReason::Timeout {
            elapsed_ms: elapsed.as_millis(),
        });
    }

    let series = match PriceSeries::from_recent_first(fetched.bars) {
        Ok(series) => series,
        Err(e) => return skip(SkipReason::BadOrientation(e.to_string())),
    };

    match config
        .evaluator
        .evaluate(symbol, &series, fetched.fundamentals)
    {
        Ok(candidate) => {
            debug!(
                symbol,
                score = candidate.score.total,
                rsi = candidate.indicators.rsi,
                atr = candidate.indicators.atr,
                rules = ?candidate.score.satisfied,
                "scored"
            );
            if candidate.is_accepted() {
                info!(symbol, score = candidate.score.total, "accepted");
            }
            SymbolOutcome::Evaluated(candidate)
        }
        Err(reason) => skip(reason),
    }
}

pub struct Scanner<'a> {
    config: &'a ScanConfig,
    data: &'a dyn MarketDataPort,
    notifier: &'a dyn NotifyPort,
    ledger: &'a dyn LedgerPort,
    record_trades: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(
        config: &'a ScanConfig,
        data: &'a dyn MarketDataPort,
        notifier: &'a dyn NotifyPort,
        ledger: &'a dyn LedgerPort,
    ) -> Self {
        Self {
            config,
            data,
            notifier,
            ledger,
            record_trades: true,
        }
    }

    /// Skip ledger appends (dry runs). Reports still read the ledger.
    pub fn without_ledger_writes(mut self) -> Self {
        self.record_trades = false;
        self
    }

    /// Full daily run for `today`.
    pub fn run(&self, today: NaiveDate) -> Result<RunOutcome, ScanError> {
        match self.config.calendar.classify(today) {
            RunMode::Holiday => {
                info!(%today, "market holiday, skipping scan");
                self.notify(&message::holiday(today));
                Ok(RunOutcome::MarketClosed(RunMode::Holiday))
            }
            RunMode::Weekend => {
                info!(%today, "weekend, skipping scan");
                self.notify(&message::weekend(today));
                Ok(RunOutcome::MarketClosed(RunMode::Weekend))
            }
            RunMode::WeeklyReport => self.weekly_report(today).map(RunOutcome::WeeklyReport),
            RunMode::Trading => Ok(self.scan(today)),
        }
    }

    /// Summarise the ledger for the week ending `today` and notify it.
    pub fn weekly_report(&self, today: NaiveDate) -> Result<LedgerReport, ScanError> {
        let records = self.ledger.read_all()?;
        let report = LedgerReport::weekly(&records, today);
        info!(
            total = report.total,
            from = %report.period_start,
            to = %report.period_end,
            "weekly report"
        );
        self.notify(&message::weekly_report(&report));
        Ok(report)
    }

    /// Scan the whole universe regardless of the calendar.
    pub fn scan(&self, today: NaiveDate) -> RunOutcome {
        info!(
            symbols = self.config.universe.count(),
            %today,
            "starting scan"
        );

        let mut candidates = Vec::new();
        let mut skipped = Vec::new();

        for symbol in self.config.universe.iter() {
            match evaluate_symbol(self.config, self.data, symbol, today) {
                SymbolOutcome::Evaluated(candidate) => candidates.push(candidate),
                SymbolOutcome::Skipped { symbol, reason } => {
                    skipped.push(SkippedSymbol { symbol, reason })
                }
            }
        }

        let evaluated = candidates.len();
        let top = rank_candidates(candidates, self.config.top_k);
        info!(
            evaluated,
            skipped = skipped.len(),
            picks = top.len(),
            "scan complete"
        );

        if top.is_empty() {
            self.notify(&message::no_opportunities(today));
            return RunOutcome::NoOpportunities { evaluated, skipped };
        }

        let mut picks = Vec::with_capacity(top.len());
        for candidate in &top {
            let Some(rec) = self.config.sizing.recommend(candidate, today) else {
                continue;
            };
            self.notify(&message::recommendation(&rec, Some(candidate)));
            if self.record_trades {
                if let Err(e) = self.ledger.append(&TradeRecord::from(&rec)) {
                    error!(symbol = %rec.symbol, "failed to record trade: {e}");
                }
            }
            picks.push(rec);
        }

        RunOutcome::Recommendations { picks, skipped }
    }

    fn notify(&self, text: &str) {
        if let Err(e) = self.notifier.send(text) {
            error!("notification failed: {e}");
        }
    }
}
