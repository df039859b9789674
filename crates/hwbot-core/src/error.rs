//! Unified error types for homework-bot.

use thiserror::Error;

/// Result type alias using HomeworkBotError.
pub type Result<T> = std::result::Result<T, HomeworkBotError>;

#[derive(Error, Debug)]
pub enum HomeworkBotError {
    // Startup errors
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    // API errors
    #[error("Homework API request failed: {0}")]
    Transport(String),

    #[error("Homework API returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("Homework API returned an undecodable body: {0}")]
    InvalidBody(String),

    #[error("Unexpected API response shape: {0}")]
    Schema(String),

    // Content errors
    #[error("Homework record has no \"{0}\" field")]
    MissingField(&'static str),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    // Channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coarse classification of an error, used by the poll loop to decide how a
/// failure is logged and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Precondition or configuration failure before the loop starts.
    Startup,
    /// The API could not be reached.
    Transport,
    /// The API answered, but not with what we expect.
    Protocol,
    /// A homework record is malformed or carries an unknown status.
    Content,
    /// The outbound message could not be delivered.
    Notification,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Startup => write!(f, "startup"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Protocol => write!(f, "protocol"),
            ErrorKind::Content => write!(f, "content"),
            ErrorKind::Notification => write!(f, "notification"),
        }
    }
}

impl HomeworkBotError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials(_) | Self::Config(_) | Self::Toml(_) => ErrorKind::Startup,
            Self::Transport(_) => ErrorKind::Transport,
            Self::UnexpectedStatus(_) | Self::InvalidBody(_) | Self::Schema(_) => ErrorKind::Protocol,
            Self::MissingField(_) | Self::UnknownStatus(_) => ErrorKind::Content,
            Self::Channel(_) => ErrorKind::Notification,
        }
    }
}
