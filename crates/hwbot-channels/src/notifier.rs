//! Notifier — delivers text to the configured chat and never fails the caller.

use hwbot_core::traits::Channel;
use hwbot_core::types::OutgoingMessage;

/// Result of a notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// The text that was attempted.
    pub message: String,
    /// Whether the channel accepted it.
    pub delivered: bool,
}

pub struct Notifier {
    channel: Box<dyn Channel>,
    chat_id: String,
}

impl Notifier {
    pub fn new(channel: Box<dyn Channel>, chat_id: impl Into<String>) -> Self {
        Self { channel, chat_id: chat_id.into() }
    }

    /// Send `message` to the chat. Send failures are logged and reported
    /// through [`Delivery::delivered`], never returned as errors.
    pub async fn notify(&self, message: &str) -> Delivery {
        tracing::debug!("Sending message via {}", self.channel.name());

        let outgoing = OutgoingMessage::text(&self.chat_id, message);
        let delivered = match self.channel.send(outgoing).await {
            Ok(()) => {
                tracing::debug!("Message delivered to chat {}", self.chat_id);
                true
            }
            Err(e) => {
                tracing::error!("Failed to deliver message via {}: {e}", self.channel.name());
                false
            }
        };

        Delivery { message: message.to_string(), delivered }
    }
}
