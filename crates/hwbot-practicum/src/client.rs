//! Homework review API client — one authorized GET per poll.

use async_trait::async_trait;
use hwbot_core::config::{BotConfig, Credentials};
use hwbot_core::error::{HomeworkBotError, Result};
use hwbot_core::traits::HomeworkSource;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;

pub struct PracticumClient {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl PracticumClient {
    pub fn new(config: &BotConfig, credentials: &Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("homework-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HomeworkBotError::config(format!("HTTP client init failed: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            token: credentials.practicum_token.clone(),
            client,
        })
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    fn name(&self) -> &str { "practicum" }

    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value> {
        tracing::debug!("Requesting homework statuses (from_date={from_date})");

        let response = self.client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| HomeworkBotError::transport(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Homework API answered {status}");
            return Err(HomeworkBotError::UnexpectedStatus(status.as_u16()));
        }

        response.json().await
            .map_err(|e| HomeworkBotError::InvalidBody(e.to_string()))
    }
}
