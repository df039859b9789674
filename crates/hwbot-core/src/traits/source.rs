//! Source of raw homework status payloads.

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait HomeworkSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch statuses updated since `from_date` (Unix seconds).
    ///
    /// Returns the decoded JSON body without checking its shape.
    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value>;
}
