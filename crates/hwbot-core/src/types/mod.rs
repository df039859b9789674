//! Shared data types.

pub mod homework;
pub mod message;

pub use homework::{HomeworkRecord, HomeworkStatus, StatusReport};
pub use message::OutgoingMessage;
