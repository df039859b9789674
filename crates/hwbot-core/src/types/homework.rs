//! Homework records and review statuses as returned by the review API.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::HomeworkBotError;

/// Review status of a homework submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// Status code as it appears in the API payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = HomeworkBotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| HomeworkBotError::UnknownStatus(s.to_string()))
    }
}

/// One submission entry from the `homeworks` array, kept exactly as the API
/// sent it. Field presence and types are checked by the status mapper, so a
/// malformed entry only matters when it is the one being described.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HomeworkRecord(serde_json::Value);

impl HomeworkRecord {
    /// Value of `key`; `None` when absent or when the entry is not an object.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for HomeworkRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Validated `homework_statuses` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusReport {
    /// Records in API order, most recent first.
    pub homeworks: Vec<HomeworkRecord>,
    /// `current_date` when it is an integer timestamp.
    pub current_date: Option<i64>,
}
