//! Domain model for per-user task lists and the pages that host them.
//!
//! # Responsibility
//! - Define canonical task and page records shared by services.
//! - Own validation rules for both, for typed values and raw JSON.
//!
//! # Invariants
//! - A record that fails validation is rejected, never coerced.
//! - Validators over raw JSON never panic.

pub mod storage_key;
pub mod task;
pub mod user_page;

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Trims `value` and collapses every internal whitespace run into one `-`.
pub(crate) fn hyphenate(value: &str) -> String {
    WHITESPACE_RUN_RE
        .replace_all(value.trim(), "-")
        .into_owned()
}
