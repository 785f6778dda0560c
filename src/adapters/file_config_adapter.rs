//! INI file configuration adapter.

use crate::domain::error::ScanError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| ScanError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, ScanError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| ScanError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[scan]
symbols = TCS,INFY,HDFCBANK
top_k = 5
market_cap_ceiling = 12000.5

[notify]
channel = console

[ledger]
backend = csv
path = trades.csv
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("scan", "symbols"),
            Some("TCS,INFY,HDFCBANK".to_string())
        );
        assert_eq!(adapter.get_int("scan", "top_k", 3), 5);
        assert_eq!(adapter.get_double("scan", "market_cap_ceiling", 0.0), 12000.5);
        assert_eq!(
            adapter.get_string("ledger", "path"),
            Some("trades.csv".to_string())
        );
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("scan", "missing"), None);
        assert_eq!(adapter.get_string("nosection", "key"), None);
        assert_eq!(adapter.get_int("scan", "lookback_days", 365), 365);
        assert_eq!(adapter.get_double("trade", "stop_atr_multiple", 1.0), 1.0);
    }

    #[test]
    fn non_numeric_values_fall_back() {
        let adapter = FileConfigAdapter::from_string("[scan]\ntop_k = many\n").unwrap();
        assert_eq!(adapter.get_int("scan", "top_k", 3), 3);
        assert_eq!(adapter.get_double("scan", "top_k", 1.5), 1.5);
    }

    #[test]
    fn bool_values() {
        let adapter =
            FileConfigAdapter::from_string("[x]\na = yes\nb = Off\nc = maybe\n").unwrap();
        assert!(adapter.get_bool("x", "a", false));
        assert!(!adapter.get_bool("x", "b", true));
        assert!(adapter.get_bool("x", "c", true));
    }

    #[test]
    fn nonempty_treats_blank_as_absent() {
        let adapter = FileConfigAdapter::from_string("[telegram]\nbot_token =   \n").unwrap();
        assert_eq!(adapter.get_nonempty("telegram", "bot_token"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("notify", "channel"),
            Some("console".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/swingscan.ini");
        assert!(matches!(result, Err(ScanError::ConfigParse { .. })));
    }
}
