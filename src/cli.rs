//! CLI definition and dispatch.
//!
//! Relative paths in the config (`symbols_file`, `[data] dir`,
//! `[ledger] path`) resolve against the directory holding the config file.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::console_notifier::ConsoleNotifier;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_ledger::CsvLedger;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::telegram_notifier::TelegramNotifier;
use crate::domain::candidate::Candidate;
use crate::domain::error::ScanError;
use crate::domain::message;
use crate::domain::recommendation::Recommendation;
use crate::domain::scan::{evaluate_symbol, RunOutcome, Scanner, SymbolOutcome};
use crate::domain::scan_config::{validate_scan_config, ScanConfig};
use crate::domain::scoring::MAX_SCORE;
use crate::domain::trade::LedgerReport;
use crate::domain::universe::{parse_symbol_lines, parse_symbols, Universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::notify_port::NotifyPort;

pub const DEFAULT_LEDGER_PATH: &str = "trades.csv";

#[derive(Parser, Debug)]
#[command(name = "swingscan", about = "Daily equity scan and paper-trade ledger")]
pub struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the daily scan (or the weekly report on report day)
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Run date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Print notifications to stdout and skip ledger writes
        #[arg(long)]
        dry_run: bool,
    },
    /// Send the weekly ledger report
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        date: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Score a single symbol without notifying or recording
    Score {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan {
            config,
            date,
            dry_run,
        } => run_scan(&config, date.as_deref(), dry_run),
        Command::Report { config, date } => run_report(&config, date.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Score {
            config,
            symbol,
            date,
        } => run_score(&config, &symbol, date.as_deref()),
    }
}

fn fail(err: ScanError) -> ExitCode {
    error!("{err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(fail)
}

fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn resolve_path(base: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Parse `--date`, defaulting to the local calendar date.
pub fn resolve_date(arg: Option<&str>) -> Result<NaiveDate, ScanError> {
    match arg {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            ScanError::invalid("cli", "date", format!("'{}' is not a YYYY-MM-DD date", raw))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Load the universe from `[scan] symbols`, falling back to `symbols_file`.
pub fn resolve_universe(config: &dyn ConfigPort, base: &Path) -> Result<Universe, ScanError> {
    if let Some(list) = config.get_nonempty("scan", "symbols") {
        return parse_symbols(&list).map_err(|e| ScanError::invalid("scan", "symbols", e.to_string()));
    }
    let file = config
        .get_nonempty("scan", "symbols_file")
        .ok_or_else(|| ScanError::missing("scan", "symbols"))?;
    let path = resolve_path(base, &file);
    let content = fs::read_to_string(&path).map_err(|e| {
        ScanError::invalid(
            "scan",
            "symbols_file",
            format!("failed to read {}: {}", path.display(), e),
        )
    })?;
    parse_symbol_lines(&content)
        .map_err(|e| ScanError::invalid("scan", "symbols_file", e.to_string()))
}

/// Validate and build the typed scan configuration.
pub fn build_scan_config(config: &dyn ConfigPort, base: &Path) -> Result<ScanConfig, ScanError> {
    validate_scan_config(config)?;
    let universe = resolve_universe(config, base)?;
    ScanConfig::from_config(config, universe)
}

pub fn open_data(config: &dyn ConfigPort, base: &Path) -> Result<CsvAdapter, ScanError> {
    let dir = config
        .get_nonempty("data", "dir")
        .ok_or_else(|| ScanError::missing("data", "dir"))?;
    let path = resolve_path(base, &dir);
    if !path.is_dir() {
        return Err(ScanError::invalid(
            "data",
            "dir",
            format!("{} is not a directory", path.display()),
        ));
    }
    CsvAdapter::open(path)
}

pub fn open_ledger(config: &dyn ConfigPort, base: &Path) -> Result<Box<dyn LedgerPort>, ScanError> {
    let path = resolve_path(
        base,
        &config
            .get_nonempty("ledger", "path")
            .unwrap_or_else(|| DEFAULT_LEDGER_PATH.to_string()),
    );
    let backend = config
        .get_nonempty("ledger", "backend")
        .unwrap_or_else(|| "csv".to_string());

    match backend.to_ascii_lowercase().as_str() {
        "csv" => Ok(Box::new(CsvLedger::new(path))),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            use crate::adapters::sqlite_ledger::SqliteLedger;
            Ok(Box::new(SqliteLedger::open(&path)?))
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => Err(ScanError::invalid(
            "ledger",
            "backend",
            "built without the sqlite feature",
        )),
        other => Err(ScanError::invalid(
            "ledger",
            "backend",
            format!("unknown backend '{}' (expected csv or sqlite)", other),
        )),
    }
}

pub fn open_notifier(config: &dyn ConfigPort, dry_run: bool) -> Result<Box<dyn NotifyPort>, ScanError> {
    if dry_run {
        return Ok(Box::new(ConsoleNotifier::stdout()));
    }
    let channel = config
        .get_nonempty("notify", "channel")
        .unwrap_or_else(|| "telegram".to_string());

    match channel.to_ascii_lowercase().as_str() {
        "telegram" => Ok(Box::new(TelegramNotifier::from_config(config)?)),
        "console" => Ok(Box::new(ConsoleNotifier::stdout())),
        other => Err(ScanError::invalid(
            "notify",
            "channel",
            format!("unknown channel '{}' (expected telegram or console)", other),
        )),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let base = config_dir(config_path);

    let scan_config = match build_scan_config(&adapter, &base) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    if let Err(e) = open_notifier(&adapter, false) {
        return fail(e);
    }

    println!(
        "Configuration valid: {} symbols, top {}, accept at {}/{}",
        scan_config.universe.count(),
        scan_config.top_k,
        scan_config.evaluator.rules.accept_threshold,
        MAX_SCORE
    );
    ExitCode::SUCCESS
}

fn run_scan(config_path: &Path, date: Option<&str>, dry_run: bool) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let base = config_dir(config_path);

    let today = match resolve_date(date) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };
    let scan_config = match build_scan_config(&adapter, &base) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    // credentials are checked before anything is fetched
    let notifier = match open_notifier(&adapter, dry_run) {
        Ok(n) => n,
        Err(e) => return fail(e),
    };
    let ledger = match open_ledger(&adapter, &base) {
        Ok(l) => l,
        Err(e) => return fail(e),
    };
    let data = match open_data(&adapter, &base) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };

    let mut scanner = Scanner::new(&scan_config, &data, notifier.as_ref(), ledger.as_ref());
    if dry_run {
        info!("dry run: ledger writes disabled");
        scanner = scanner.without_ledger_writes();
    }

    match scanner.run(today) {
        Ok(outcome) => {
            log_outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn log_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::MarketClosed(mode) => info!(?mode, "market closed"),
        RunOutcome::WeeklyReport(report) => info!(trades = report.total, "weekly report sent"),
        RunOutcome::NoOpportunities { evaluated, skipped } => info!(
            evaluated,
            skipped = skipped.len(),
            "no opportunities"
        ),
        RunOutcome::Recommendations { picks, skipped } => {
            let symbols: Vec<&str> = picks.iter().map(|p| p.symbol.as_str()).collect();
            info!(picks = ?symbols, skipped = skipped.len(), "recommendations sent");
        }
    }
}

fn run_report(config_path: &Path, date: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let base = config_dir(config_path);

    let today = match resolve_date(date) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };
    let notifier = match open_notifier(&adapter, false) {
        Ok(n) => n,
        Err(e) => return fail(e),
    };
    let ledger = match open_ledger(&adapter, &base) {
        Ok(l) => l,
        Err(e) => return fail(e),
    };

    let records = match ledger.read_all() {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let report = LedgerReport::weekly(&records, today);
    info!(
        total = report.total,
        from = %report.period_start,
        to = %report.period_end,
        "weekly report"
    );
    match notifier.send(&message::weekly_report(&report)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn run_score(config_path: &Path, symbol: &str, date: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let base = config_dir(config_path);

    let today = match resolve_date(date) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };
    let mut scan_config = match build_scan_config(&adapter, &base) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let symbol = symbol.trim().to_uppercase();
    // the symbol need not be in the configured universe
    scan_config.universe = Universe {
        symbols: vec![symbol.clone()],
    };
    let data = match open_data(&adapter, &base) {
        Ok(d) => d,
        Err(e) => return fail(e),
    };

    match evaluate_symbol(&scan_config, &data, &symbol, today) {
        SymbolOutcome::Evaluated(candidate) => {
            let rec = scan_config.sizing.recommend(&candidate, today);
            println!("{}", format_breakdown(&candidate, rec));
            ExitCode::SUCCESS
        }
        SymbolOutcome::Skipped { symbol, reason } => fail(reason.into_error(&symbol)),
    }
}

/// Human-readable score breakdown for the `score` command.
pub fn format_breakdown(
    candidate: &Candidate,
    recommendation: Option<Recommendation>,
) -> String {
    let ratio = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
    let f = &candidate.fundamentals;
    let ind = &candidate.indicators;

    let mut lines = vec![
        format!("{} as of {}", candidate.symbol, candidate.as_of),
        format!("  Price:          {:.2}", candidate.latest_price),
        format!("  Market cap:     {}", ratio(f.market_cap)),
        format!("  ROE:            {}", ratio(f.return_on_equity)),
        format!("  Debt/Equity:    {}", ratio(f.debt_to_equity)),
        format!("  Profit margin:  {}", ratio(f.profit_margin)),
        format!("  RSI:            {:.2}", ind.rsi),
        format!("  ATR:            {:.2}", ind.atr),
        format!(
            "  MACD:           {:.4} / signal {:.4}",
            ind.macd_line, ind.macd_signal
        ),
    ];
    for rule in &candidate.score.satisfied {
        lines.push(format!("  + {:>2}  {}", rule.points(), rule));
    }
    lines.push(format!(
        "  Score:          {}/{} ({:?})",
        candidate.score.total, MAX_SCORE, candidate.decision
    ));
    if let Some(rec) = recommendation {
        let dp = rec.price_decimals as usize;
        lines.push(format!(
            "  Entry {:.*}  Target {:.*}  Stop {:.*}",
            dp, rec.entry, dp, rec.target, dp, rec.stop_loss
        ));
    }
    lines.join("\n")
}
