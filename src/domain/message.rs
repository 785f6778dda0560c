//! Fixed human-readable notification layouts.

use crate::domain::candidate::Candidate;
use crate::domain::recommendation::Recommendation;
use crate::domain::trade::LedgerReport;
use crate::domain::scoring::MAX_SCORE;
use chrono::NaiveDate;
use std::fmt::{self, Write};

const DATE_FMT: &str = "%d-%m-%Y";

pub fn holiday(date: NaiveDate) -> String {
    format!(
        "Market Holiday\nDate: {}\n\nNo scan today. Markets are closed.",
        date.format(DATE_FMT)
    )
}

pub fn weekend(date: NaiveDate) -> String {
    format!(
        "Weekend\nDate: {}\n\nNo scan today. Next scan on the next trading day.",
        date.format(DATE_FMT)
    )
}

pub fn no_opportunities(date: NaiveDate) -> String {
    format!(
        "Swing Scan\nDate: {}\n\nNo opportunities today. No symbol met the entry criteria.",
        date.format(DATE_FMT)
    )
}

pub fn recommendation(rec: &Recommendation, candidate: Option<&Candidate>) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_recommendation(&mut out, rec, candidate);
    out
}

fn write_recommendation(
    out: &mut String,
    rec: &Recommendation,
    candidate: Option<&Candidate>,
) -> fmt::Result {
    let dp = rec.price_decimals as usize;
    writeln!(out, "BUY SIGNAL: {}", rec.symbol)?;
    writeln!(out, "Date: {}", rec.created.format(DATE_FMT))?;
    writeln!(out)?;
    writeln!(out, "Entry:     {:.*}", dp, rec.entry)?;
    writeln!(out, "Target:    {:.*}", dp, rec.target)?;
    writeln!(out, "Stop Loss: {:.*}", dp, rec.stop_loss)?;
    writeln!(out)?;
    writeln!(out, "Score: {}/{}", rec.score, MAX_SCORE)?;
    writeln!(out, "RSI:   {:.1}", rec.rsi)?;
    writeln!(out, "ATR:   {:.*}", dp, rec.atr)?;
    if let Some(candidate) = candidate {
        let trend = if candidate.indicators.macd_above_signal() {
            "above"
        } else {
            "below"
        };
        writeln!(out, "MACD:  {} signal", trend)?;
        if !candidate.score.satisfied.is_empty() {
            let reasons: Vec<String> = candidate
                .score
                .satisfied
                .iter()
                .map(|r| r.to_string())
                .collect();
            writeln!(out, "Why:   {}", reasons.join(", "))?;
        }
    }
    write!(out, "\nPaper trade only. Not investment advice.")
}

pub fn weekly_report(report: &LedgerReport) -> String {
    let mut out = String::new();
    let _ = write_weekly_report(&mut out, report);
    out.truncate(out.trim_end().len());
    out
}

fn write_weekly_report(out: &mut String, report: &LedgerReport) -> fmt::Result {
    writeln!(out, "Weekly Trade Report")?;
    writeln!(
        out,
        "Period: {} to {}",
        report.period_start.format(DATE_FMT),
        report.period_end.format(DATE_FMT)
    )?;
    writeln!(out)?;
    if report.is_empty() {
        return write!(out, "No trades this period.");
    }
    writeln!(out, "Total signals: {}", report.total)?;
    for (symbol, count) in &report.by_symbol {
        writeln!(out, "  {}: {}", symbol, count)?;
    }
    Ok(())
}
