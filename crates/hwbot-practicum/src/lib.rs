//! # hwbot-practicum
//! Everything that knows about the homework review API: the HTTP client, the
//! response shape check, and the status-to-text mapping.

pub mod client;
pub mod status;
pub mod validator;

pub use client::PracticumClient;
pub use status::{describe, STATUS_CHANGED_PREFIX};
pub use validator::validate;
