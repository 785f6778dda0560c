//! Telegram Bot API notifier.

use crate::domain::error::ScanError;
use crate::ports::config_port::ConfigPort;
use crate::ports::notify_port::NotifyPort;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub const TOKEN_ENV: &str = "TG_BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "TG_CHAT_ID";
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Result<Self, ScanError> {
        Self::with_api_base(DEFAULT_API_BASE, token, chat_id)
    }

    pub fn with_api_base(api_base: &str, token: String, chat_id: String) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| ScanError::Notify {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            chat_id,
        })
    }

    /// Credentials come from `TG_BOT_TOKEN` / `TG_CHAT_ID`, falling back to
    /// `[telegram] bot_token` / `chat_id`. Either missing is fatal.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScanError> {
        Self::from_sources(config, |key| std::env::var(key).ok())
    }

    pub fn from_sources(
        config: &dyn ConfigPort,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ScanError> {
        let (token, chat_id) = resolve_credentials(config, env)?;
        let api_base = config
            .get_nonempty("telegram", "api_base")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::with_api_base(&api_base, token, chat_id)
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

/// Look up bot token and chat id, environment first.
pub fn resolve_credentials(
    config: &dyn ConfigPort,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(String, String), ScanError> {
    let lookup = |env_key: &str, key: &str| {
        env(env_key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| config.get_nonempty("telegram", key))
            .ok_or_else(|| ScanError::missing("telegram", key))
    };
    Ok((lookup(TOKEN_ENV, "bot_token")?, lookup(CHAT_ID_ENV, "chat_id")?))
}

impl NotifyPort for TelegramNotifier {
    fn send(&self, text: &str) -> Result<(), ScanError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });
        let response = self
            .client
            .post(self.send_url())
            .json(&body)
            .send()
            .map_err(|e| ScanError::Notify {
                // reqwest errors embed the URL, which carries the token
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Notify {
                reason: format!("telegram returned {}", status),
            });
        }
        debug!(chars = text.len(), "telegram message sent");
        Ok(())
    }
}
