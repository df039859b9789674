//! Telegram Bot channel — REST API, send-only.
//!
//! Uses `sendMessage` for delivery and `getMe` to verify the token.

use async_trait::async_trait;
use hwbot_core::config::{BotConfig, Credentials, DEFAULT_TELEGRAM_API_URL};
use hwbot_core::error::{HomeworkBotError, Result};
use hwbot_core::traits::Channel;
use hwbot_core::types::OutgoingMessage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Telegram channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String { DEFAULT_TELEGRAM_API_URL.into() }
fn default_timeout() -> u64 { 30 }

impl TelegramConfig {
    pub fn from_bot_config(config: &BotConfig, credentials: &Credentials) -> Self {
        Self {
            bot_token: credentials.telegram_token.clone(),
            api_url: config.telegram_api_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout_secs,
        }
    }
}

/// Telegram Bot channel.
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HomeworkBotError::config(format!("Telegram client init failed: {e}")))?;

        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.config.api_url, self.config.bot_token)
    }

    /// Unwrap the `{ok, result, description}` envelope every Bot API method
    /// answers with.
    async fn read_envelope<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        let status = response.status();
        let envelope: TelegramResponse<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(HomeworkBotError::channel(format!(
                    "Telegram {method}: invalid response: {}",
                    e.without_url()
                )));
            }
            Err(_) => {
                return Err(HomeworkBotError::channel(format!("Telegram {method} {status}")));
            }
        };

        if !status.is_success() || !envelope.ok {
            let description = envelope.description.unwrap_or_default();
            return Err(HomeworkBotError::channel(format!(
                "Telegram {method} {status}: {description}"
            )));
        }
        Ok(envelope.result)
    }

    /// Send a text message to a chat.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({ "chat_id": chat_id, "text": text });

        let response = self.client.post(self.method_url("sendMessage")).json(&body).send().await
            .map_err(|e| HomeworkBotError::channel(format!("Telegram send failed: {}", e.without_url())))?;

        Self::read_envelope::<serde_json::Value>("sendMessage", response).await?;
        Ok(())
    }

    /// Get current bot info.
    pub async fn get_me(&self) -> Result<TelegramUser> {
        let response = self.client.get(self.method_url("getMe")).send().await
            .map_err(|e| HomeworkBotError::channel(format!("getMe failed: {}", e.without_url())))?;

        Self::read_envelope("getMe", response).await?
            .ok_or_else(|| HomeworkBotError::channel("getMe returned no result"))
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str { "telegram" }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        self.send_message(&message.chat_id, &message.content).await
    }
}

// --- Telegram API Types ---

#[derive(Debug, Clone, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}
