//! Homework record → chat text.

use hwbot_core::error::{HomeworkBotError, Result};
use hwbot_core::types::{HomeworkRecord, HomeworkStatus};

pub const STATUS_CHANGED_PREFIX: &str = "Изменился статус проверки работы";

/// Format the status-change notification for one record.
///
/// A present but non-string `homework_name` is rendered as JSON; a present
/// but non-string `status` is an unknown status.
pub fn describe(record: &HomeworkRecord) -> Result<String> {
    let name = record.field("homework_name")
        .ok_or(HomeworkBotError::MissingField("homework_name"))?;
    let status = record.field("status")
        .ok_or(HomeworkBotError::MissingField("status"))?;

    let status: HomeworkStatus = match status.as_str() {
        Some(code) => code.parse()?,
        None => return Err(HomeworkBotError::UnknownStatus(status.to_string())),
    };
    let name = name.as_str().map_or_else(|| name.to_string(), str::to_string);

    Ok(format!("{STATUS_CHANGED_PREFIX} \"{name}\". {}", status.verdict()))
}
