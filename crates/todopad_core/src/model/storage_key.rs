//! Store keys for per-user task collections.
//!
//! # Invariants
//! - Same name always yields the same key.
//! - Distinct names may collide after whitespace normalization
//!   (`"A B"` and `"A-B"`); no disambiguation is applied.

use super::hyphenate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STORAGE_KEY_SUFFIX: &str = "-todos";

/// Key of one user's task collection, shaped `<normalized-name>-todos`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKeyError {
    /// Name is empty after trimming.
    EmptyName,
}

impl Display for StorageKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "user name must not be empty"),
        }
    }
}

impl Error for StorageKeyError {}

/// Derives the task-collection key for `name`.
///
/// Whitespace is trimmed and internal runs become a single `-`; every other
/// character, including case and non-Latin scripts, is kept as is.
///
/// # Errors
/// - `StorageKeyError::EmptyName` when `name` is blank.
pub fn generate_storage_key(name: &str) -> Result<StorageKey, StorageKeyError> {
    let normalized = hyphenate(name);
    if normalized.is_empty() {
        return Err(StorageKeyError::EmptyName);
    }
    Ok(StorageKey(format!("{normalized}{STORAGE_KEY_SUFFIX}")))
}

#[cfg(test)]
mod tests {
    use super::{generate_storage_key, StorageKeyError};

    #[test]
    fn keeps_case_and_non_latin_names() {
        assert_eq!(generate_storage_key("Tanaka").unwrap().as_str(), "Tanaka-todos");
        assert_eq!(generate_storage_key("田中 太郎").unwrap().as_str(), "田中-太郎-todos");
    }

    #[test]
    fn rejects_whitespace_only_name() {
        assert_eq!(generate_storage_key(" \t\n"), Err(StorageKeyError::EmptyName));
    }
}
