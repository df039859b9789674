//! # hwbot-scheduler
//!
//! The poll loop. One cycle is strictly sequential:
//!
//! ```text
//! PollEngine (tokio sleep between cycles)
//!   ├── HomeworkSource::fetch(from_date)
//!   ├── validate → first record → describe
//!   ├── Notifier (only when the text changed)
//!   └── on any error → "Сбой в работе программы: …" (only when it changed)
//! ```

pub mod engine;
pub mod state;

pub use engine::{CycleOutcome, PollEngine, FAILURE_PREFIX};
pub use state::PollState;
