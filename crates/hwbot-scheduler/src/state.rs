//! In-memory state carried between poll cycles.

/// Lives for the process lifetime; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Last status text the chat actually received.
    pub last_delivered_message: Option<String>,
    /// Last failure text the chat actually received.
    pub last_reported_error: Option<String>,
    /// Lower bound sent as `from_date` on the next request.
    pub from_date: i64,
}

impl PollState {
    pub fn starting_at(from_date: i64) -> Self {
        Self { from_date, ..Self::default() }
    }
}
