//! Seams between the poll loop and its collaborators.

pub mod channel;
pub mod source;

pub use channel::Channel;
pub use source::HomeworkSource;
