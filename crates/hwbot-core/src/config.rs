//! Configuration: secrets from the environment, tunables from an optional
//! TOML file at `~/.homework-bot/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{HomeworkBotError, Result};

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// The three secrets the bot cannot run without.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    pub fn new(
        practicum_token: impl Into<String>,
        telegram_token: impl Into<String>,
        telegram_chat_id: impl Into<String>,
    ) -> Self {
        Self {
            practicum_token: practicum_token.into(),
            telegram_token: telegram_token.into(),
            telegram_chat_id: telegram_chat_id.into(),
        }
    }

    /// Read credentials from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`. Empty values count as missing and
    /// every missing name is reported in one error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let practicum_token = read(PRACTICUM_TOKEN_VAR);
        let telegram_token = read(TELEGRAM_TOKEN_VAR);
        let telegram_chat_id = read(TELEGRAM_CHAT_ID_VAR);

        match (practicum_token, telegram_token, telegram_chat_id) {
            (Some(p), Some(t), Some(c)) => Ok(Self::new(p, t, c)),
            (p, t, c) => {
                let missing = [
                    (PRACTICUM_TOKEN_VAR, p.is_none()),
                    (TELEGRAM_TOKEN_VAR, t.is_none()),
                    (TELEGRAM_CHAT_ID_VAR, c.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name.to_string())
                .collect();
                Err(HomeworkBotError::MissingCredentials(missing))
            }
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Runtime tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotConfig {
    /// Homework statuses endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Seconds to sleep between poll cycles.
    #[serde(default = "default_retry_period")]
    pub retry_period_secs: u64,
    /// Per-request timeout for API and bot calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    /// Move `from_date` to the response's `current_date` after each
    /// successful poll instead of resending the start time.
    #[serde(default = "default_true")]
    pub advance_from_date: bool,
}

fn default_endpoint() -> String { DEFAULT_ENDPOINT.into() }
fn default_retry_period() -> u64 { 600 }
fn default_request_timeout() -> u64 { 30 }
fn default_telegram_api_url() -> String { DEFAULT_TELEGRAM_API_URL.into() }
fn default_true() -> bool { true }

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            retry_period_secs: default_retry_period(),
            request_timeout_secs: default_request_timeout(),
            telegram_api_url: default_telegram_api_url(),
            advance_from_date: default_true(),
        }
    }
}

impl BotConfig {
    /// `~/.homework-bot`
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".homework-bot")
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Load from the default path, falling back to defaults when the file
    /// does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. A missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HomeworkBotError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(HomeworkBotError::config("endpoint must not be empty"));
        }
        if self.telegram_api_url.trim().is_empty() {
            return Err(HomeworkBotError::config("telegram_api_url must not be empty"));
        }
        if self.retry_period_secs == 0 {
            return Err(HomeworkBotError::config("retry_period_secs must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(HomeworkBotError::config("request_timeout_secs must be positive"));
        }
        Ok(())
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
