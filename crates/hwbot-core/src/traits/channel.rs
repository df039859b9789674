//! Outbound messaging channel.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::OutgoingMessage;

/// A bot API able to deliver a text message to a chat.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one message. Errors are transport or API rejections.
    async fn send(&self, message: OutgoingMessage) -> Result<()>;
}
