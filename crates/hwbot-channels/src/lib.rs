//! # hwbot-channels
//! Outbound chat delivery: the Telegram Bot API channel and the `Notifier`
//! the poll loop talks to.

pub mod notifier;
pub mod telegram;

pub use notifier::{Delivery, Notifier};
pub use telegram::{TelegramChannel, TelegramConfig};
