//! CLI integration tests with real INI, CSV and ledger files on disk.
//!
//! Tests cover:
//! - Argument parsing for every subcommand
//! - Config loading and validation (build_scan_config)
//! - Adapter selection (ledger backend, notifier channel)
//! - Full scan through `cli::run` with a CSV data directory and CSV ledger
//! - Dry runs leave the ledger untouched

mod common;

use clap::Parser;
use common::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use swingscan::adapters::csv_adapter::FUNDAMENTALS_FILE;
use swingscan::adapters::file_config_adapter::FileConfigAdapter;
use swingscan::cli::{self, Cli, Command};
use swingscan::domain::error::ScanError;
use swingscan::domain::scan::{RunOutcome, Scanner};
use swingscan::ports::ledger_port::LedgerPort;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[scan]
symbols = GOOD, WEAK
lookback_days = 120
top_k = 2
market_cap_ceiling = 10000

[scoring]
roe_min = 0.15
debt_to_equity_max = 0.5
profit_margin_min = 0.10
rsi_oversold = 35
accept_threshold = 30

[trade]
target_atr_multiple = 1.8
stop_atr_multiple = 1.0

[calendar]
holidays = 2024-08-15, 2024-10-02
report_day = Sat

[data]
dir = data

[ledger]
backend = csv
path = ledger/trades.csv

[notify]
channel = console
"#;

fn write_price_csv(dir: &Path, symbol: &str, bars: &[DailyBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},1000\n",
            bar.date.format("%Y-%m-%d"),
            bar.close,
            bar.high,
            bar.low,
            bar.close
        ));
    }
    fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}

/// Config dir with `config.ini`, `data/` (GOOD oversold, WEAK rising) and
/// a ledger path that does not exist yet.
fn setup_workspace(ini: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.ini"), ini).unwrap();

    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    write_price_csv(&data, "GOOD", &oversold_bars(trading_day()));
    write_price_csv(
        &data,
        "WEAK",
        &bars_from_closes(&rising_closes(60), trading_day()),
    );
    fs::write(
        data.join(FUNDAMENTALS_FILE),
        "symbol,market_cap,return_on_equity,debt_to_equity,profit_margin\n\
         GOOD,5000,0.20,0.30,0.12\n\
         WEAK,2000,0.05,1.20,0.02\n",
    )
    .unwrap();
    dir
}

mod argument_parsing {
    use super::*;

    #[test]
    fn scan_with_date_and_dry_run() {
        let cli = Cli::try_parse_from([
            "swingscan", "scan", "--config", "c.ini", "--date", "2024-06-05", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Scan {
                config,
                date,
                dry_run,
            } => {
                assert_eq!(config, Path::new("c.ini"));
                assert_eq!(date.as_deref(), Some("2024-06-05"));
                assert!(dry_run);
            }
            other => panic!("expected scan, got {other:?}"),
        }
    }

    #[test]
    fn score_requires_symbol() {
        assert!(Cli::try_parse_from(["swingscan", "score", "--config", "c.ini"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["swingscan", "validate", "-c", "c.ini", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Validate { .. }));
    }

    #[test]
    fn report_parses() {
        let cli = Cli::try_parse_from(["swingscan", "report", "-c", "c.ini"]).unwrap();
        assert!(matches!(cli.command, Command::Report { date: None, .. }));
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn valid_ini_builds_scan_config() {
        let file = write_temp_ini(VALID_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let config = cli::build_scan_config(&adapter, Path::new(".")).unwrap();

        assert_eq!(config.universe.symbols, vec!["GOOD", "WEAK"]);
        assert_eq!(config.top_k, 2);
        assert_eq!(config.lookback_days, 120);
        assert!(config.calendar.is_holiday(date(2024, 8, 15)));
    }

    #[test]
    fn missing_universe_is_config_missing() {
        let file = write_temp_ini("[scan]\ntop_k = 3\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let err = cli::build_scan_config(&adapter, Path::new(".")).unwrap_err();
        assert!(matches!(err, ScanError::ConfigMissing { .. }));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn unreadable_symbols_file_is_config_invalid() {
        let file = write_temp_ini("[scan]\nsymbols_file = nowhere.txt\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(matches!(
            cli::build_scan_config(&adapter, Path::new("/nonexistent")),
            Err(ScanError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn bad_holiday_is_config_invalid() {
        let file = write_temp_ini("[scan]\nsymbols = TCS\n[calendar]\nholidays = 2024-13-01\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(matches!(
            cli::build_scan_config(&adapter, Path::new(".")),
            Err(ScanError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn missing_config_file_fails_to_load() {
        let dir = TempDir::new().unwrap();
        assert!(cli::load_config(&dir.path().join("absent.ini")).is_err());
    }

    #[test]
    fn unknown_channel_is_config_invalid() {
        let adapter = FileConfigAdapter::from_string("[notify]\nchannel = pigeon\n").unwrap();
        assert!(matches!(
            cli::open_notifier(&adapter, false),
            Err(ScanError::ConfigInvalid { .. })
        ));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_backend_opens_file() {
        let dir = TempDir::new().unwrap();
        let adapter = FileConfigAdapter::from_string(
            "[ledger]\nbackend = sqlite\npath = trades.db\n",
        )
        .unwrap();
        let ledger = cli::open_ledger(&adapter, dir.path()).unwrap();
        assert!(ledger.read_all().unwrap().is_empty());
        assert!(dir.path().join("trades.db").exists());
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn scan_from_disk_records_accepted_symbol() {
        let dir = setup_workspace(VALID_INI);
        let config_path = dir.path().join("config.ini");
        let adapter = cli::load_config(&config_path).unwrap();

        let config = cli::build_scan_config(&adapter, dir.path()).unwrap();
        let data = cli::open_data(&adapter, dir.path()).unwrap();
        let ledger = cli::open_ledger(&adapter, dir.path()).unwrap();
        let notifier = RecordingNotifier::new();

        let outcome = Scanner::new(&config, &data, &notifier, ledger.as_ref())
            .run(trading_day())
            .unwrap();

        let RunOutcome::Recommendations { picks, skipped } = outcome else {
            panic!("expected recommendations, got {outcome:?}");
        };
        assert!(skipped.is_empty());
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].symbol, "GOOD");

        let content = fs::read_to_string(dir.path().join("ledger/trades.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date,symbol,entry,target,stop_loss,status");
        assert_eq!(lines[1], "2024-06-05,GOOD,78,81.6,76,OPEN");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn run_scan_command_appends_to_ledger() {
        let dir = setup_workspace(VALID_INI);
        let config_path = dir.path().join("config.ini");

        cli::run(Cli {
            verbose: false,
            command: Command::Scan {
                config: config_path,
                date: Some("2024-06-05".into()),
                dry_run: false,
            },
        });

        let ledger = fs::read_to_string(dir.path().join("ledger/trades.csv")).unwrap();
        assert!(ledger.contains("GOOD"));
        assert!(!ledger.contains("WEAK"));
    }

    #[test]
    fn dry_run_leaves_ledger_untouched() {
        let dir = setup_workspace(VALID_INI);
        let config_path = dir.path().join("config.ini");

        cli::run(Cli {
            verbose: false,
            command: Command::Scan {
                config: config_path,
                date: Some("2024-06-05".into()),
                dry_run: true,
            },
        });

        assert!(!dir.path().join("ledger/trades.csv").exists());
    }

    #[test]
    fn holiday_run_never_touches_ledger() {
        let dir = setup_workspace(VALID_INI);
        cli::run(Cli {
            verbose: false,
            command: Command::Scan {
                config: dir.path().join("config.ini"),
                date: Some("2024-08-15".into()),
                dry_run: false,
            },
        });
        assert!(!dir.path().join("ledger/trades.csv").exists());
    }

    #[test]
    fn score_breakdown_lists_rules() {
        let dir = setup_workspace(VALID_INI);
        let adapter = cli::load_config(&dir.path().join("config.ini")).unwrap();
        let config = cli::build_scan_config(&adapter, dir.path()).unwrap();
        let data = cli::open_data(&adapter, dir.path()).unwrap();

        let outcome =
            swingscan::domain::scan::evaluate_symbol(&config, &data, "GOOD", trading_day());
        let swingscan::domain::scan::SymbolOutcome::Evaluated(candidate) = outcome else {
            panic!("expected GOOD to be evaluated");
        };
        let rec = config.sizing.recommend(&candidate, trading_day());
        let text = cli::format_breakdown(&candidate, rec);

        assert!(text.starts_with("GOOD as of 2024-06-05"));
        assert!(text.contains("Score:          50/50 (Accept)"));
        assert!(text.contains("Entry 78.00  Target 81.60  Stop 76.00"));
    }
}
