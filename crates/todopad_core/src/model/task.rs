//! Task item model.
//!
//! # Responsibility
//! - Define the persisted shape of one to-do entry.
//! - Validate typed items and raw JSON candidates with the same rules.
//!
//! # Invariants
//! - `id` is strictly positive.
//! - `text` holds 1..=500 characters after trimming.
//! - `created_at` parses as a calendar date or date-time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum task text length, counted in characters after trimming.
pub const MAX_TASK_TEXT_CHARS: usize = 500;

/// Task identifier. New ids are derived from epoch milliseconds.
pub type TaskId = i64;

/// Validation error for task items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty after trimming.
    EmptyText,
    /// Text exceeds `MAX_TASK_TEXT_CHARS` after trimming.
    TextTooLong { chars: usize },
    /// Id is missing, not an integer, or not strictly positive.
    InvalidId(String),
    /// Timestamp is missing or not a calendar date/date-time.
    InvalidCreatedAt(String),
    /// Candidate is not a JSON object or a field has the wrong type.
    Malformed(&'static str),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::TextTooLong { chars } => write!(
                f,
                "task text has {chars} characters; at most {MAX_TASK_TEXT_CHARS} allowed"
            ),
            Self::InvalidId(value) => write!(f, "task id must be a positive integer, got {value}"),
            Self::InvalidCreatedAt(value) => {
                write!(f, "task createdAt is not a valid date-time: `{value}`")
            }
            Self::Malformed(details) => write!(f, "malformed task item: {details}"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do entry as stored under a user's storage key.
///
/// Deserialization runs the same checks as [`validate_task_item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", rename_all = "camelCase")]
pub struct TaskItem {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// Kept as stored; new items use RFC 3339 UTC with milliseconds.
    pub created_at: String,
}

impl TaskItem {
    /// Creates an open task stamped with the current time.
    ///
    /// # Errors
    /// - `EmptyText` / `TextTooLong` when trimmed `text` is out of range.
    pub fn new(text: &str) -> Result<Self, TaskValidationError> {
        let text = normalize_text(text)?;
        let now = Utc::now();
        Ok(Self {
            id: now.timestamp_millis().max(1),
            text,
            completed: false,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Checks every field invariant.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id <= 0 {
            return Err(TaskValidationError::InvalidId(self.id.to_string()));
        }
        check_text(&self.text)?;
        if !is_valid_timestamp(&self.created_at) {
            return Err(TaskValidationError::InvalidCreatedAt(
                self.created_at.clone(),
            ));
        }
        Ok(())
    }

    /// Flips `completed` and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    /// Replaces the text with the trimmed `text`; unchanged on error.
    pub fn set_text(&mut self, text: &str) -> Result<(), TaskValidationError> {
        self.text = normalize_text(text)?;
        Ok(())
    }
}

impl TryFrom<Value> for TaskItem {
    type Error = TaskValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        TaskItem::from_json(&value)
    }
}

impl TaskItem {
    /// Builds a task from a raw JSON candidate, rejecting any mismatch.
    ///
    /// Unknown extra fields are ignored. Integral floats (`3.0`) are
    /// accepted as ids.
    pub fn from_json(candidate: &Value) -> Result<Self, TaskValidationError> {
        let object = candidate
            .as_object()
            .ok_or(TaskValidationError::Malformed("expected a JSON object"))?;

        let id_value = object
            .get("id")
            .ok_or(TaskValidationError::Malformed("missing id"))?;
        let id = positive_integer(id_value)
            .ok_or_else(|| TaskValidationError::InvalidId(id_value.to_string()))?;

        let text = object
            .get("text")
            .and_then(Value::as_str)
            .ok_or(TaskValidationError::Malformed("text must be a string"))?;
        check_text(text)?;

        let completed = object
            .get("completed")
            .and_then(Value::as_bool)
            .ok_or(TaskValidationError::Malformed("completed must be a boolean"))?;

        let created_at = object
            .get("createdAt")
            .and_then(Value::as_str)
            .ok_or(TaskValidationError::Malformed("createdAt must be a string"))?;
        if !is_valid_timestamp(created_at) {
            return Err(TaskValidationError::InvalidCreatedAt(created_at.to_string()));
        }

        Ok(Self {
            id,
            text: text.to_string(),
            completed,
            created_at: created_at.to_string(),
        })
    }
}

/// Creates a new open task from user input.
///
/// Equivalent to [`TaskItem::new`].
pub fn create_task_item(text: &str) -> Result<TaskItem, TaskValidationError> {
    TaskItem::new(text)
}

/// Returns whether `candidate` is a well-formed task item. Never panics.
pub fn validate_task_item(candidate: &Value) -> bool {
    TaskItem::from_json(candidate).is_ok()
}

fn normalize_text(text: &str) -> Result<String, TaskValidationError> {
    let trimmed = text.trim();
    check_text(trimmed)?;
    Ok(trimmed.to_string())
}

fn check_text(text: &str) -> Result<(), TaskValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyText);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_TASK_TEXT_CHARS {
        return Err(TaskValidationError::TextTooLong { chars });
    }
    Ok(())
}

fn positive_integer(value: &Value) -> Option<TaskId> {
    if let Some(id) = value.as_i64() {
        return (id > 0).then_some(id);
    }
    // u64 beyond i64::MAX cannot be represented as a TaskId.
    if value.is_u64() {
        return None;
    }
    let float = value.as_f64()?;
    if !float.is_finite() || float.fract() != 0.0 || float <= 0.0 || float > i64::MAX as f64 {
        return None;
    }
    Some(float as TaskId)
}

fn is_valid_timestamp(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }
    const OFFSET_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
    ];
    if OFFSET_FORMATS
        .iter()
        .any(|format| DateTime::parse_from_str(value, format).is_ok())
    {
        return true;
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    if NAIVE_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
    {
        return true;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::{is_valid_timestamp, positive_integer};
    use serde_json::json;

    #[test]
    fn timestamp_accepts_iso_shapes() {
        assert!(is_valid_timestamp("2024-01-01"));
        assert!(is_valid_timestamp("2024-01-01T09:30"));
        assert!(is_valid_timestamp("2024-01-01T09:30:15.250"));
        assert!(is_valid_timestamp("2024-01-01T09:30:15.250Z"));
        assert!(is_valid_timestamp("2024-01-01T09:30:15+09:00"));
    }

    #[test]
    fn timestamp_accepts_space_separator_and_compact_offset() {
        assert!(is_valid_timestamp("2024-01-01 10:00:00"));
        assert!(is_valid_timestamp("2024-01-01 10:00"));
        assert!(is_valid_timestamp("2024-01-01T10:00:00.000+0900"));
        assert!(is_valid_timestamp("2024-01-01 10:00:00+09:00"));
        assert!(!is_valid_timestamp("2024-01-01 25:00:00"));
    }

    #[test]
    fn timestamp_rejects_garbage_and_impossible_dates() {
        assert!(!is_valid_timestamp(""));
        assert!(!is_valid_timestamp("yesterday"));
        assert!(!is_valid_timestamp("2024-02-30"));
        assert!(!is_valid_timestamp("2024-13-01T00:00:00Z"));
    }

    #[test]
    fn positive_integer_accepts_integral_floats_only() {
        assert_eq!(positive_integer(&json!(42)), Some(42));
        assert_eq!(positive_integer(&json!(42.0)), Some(42));
        assert_eq!(positive_integer(&json!(42.5)), None);
        assert_eq!(positive_integer(&json!(0)), None);
        assert_eq!(positive_integer(&json!(-7)), None);
        assert_eq!(positive_integer(&json!("42")), None);
        assert_eq!(positive_integer(&json!(u64::MAX)), None);
    }
}
