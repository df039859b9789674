//! Outbound chat messages.

use serde::{Deserialize, Serialize};

/// Text message addressed to a single chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: String,
    pub content: String,
}

impl OutgoingMessage {
    pub fn text(chat_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            content: content.into(),
        }
    }
}
