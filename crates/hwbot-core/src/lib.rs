//! # hwbot-core
//! Error taxonomy, configuration, shared types, and the traits the poll loop
//! is built on.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{BotConfig, Credentials};
pub use error::{ErrorKind, HomeworkBotError, Result};
