//! Shape check for the `homework_statuses` response.

use hwbot_core::error::{HomeworkBotError, Result};
use hwbot_core::types::{HomeworkRecord, StatusReport};
use serde_json::Value;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check that `value` is an object carrying a `homeworks` array and a
/// `current_date`, and return the records unchanged and in their original
/// order. Individual records are not inspected here.
pub fn validate(value: Value) -> Result<StatusReport> {
    let mut body = match value {
        Value::Object(body) => body,
        other => {
            return Err(HomeworkBotError::schema(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            )));
        }
    };

    let Some(homeworks) = body.remove("homeworks") else {
        return Err(HomeworkBotError::schema("response has no \"homeworks\" key"));
    };
    let Some(current_date) = body.get("current_date") else {
        return Err(HomeworkBotError::schema("response has no \"current_date\" key"));
    };
    let current_date = current_date.as_i64();

    let homeworks = match homeworks {
        Value::Array(items) => items,
        other => {
            return Err(HomeworkBotError::schema(format!(
                "\"homeworks\" should be an array, got {}",
                type_name(&other)
            )));
        }
    };

    let homeworks = homeworks.into_iter().map(HomeworkRecord::from).collect();

    Ok(StatusReport { homeworks, current_date })
}
