//! User page descriptor.
//!
//! # Responsibility
//! - Describe one user's routed page: display name, icon glyph, route path.
//! - Derive the route path from a display name.
//!
//! # Invariants
//! - `name` holds 1..=50 characters after trimming.
//! - `icon` is exactly one extended grapheme cluster.
//! - `path` starts with `/` and ends with `-todo`.

use super::hyphenate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

pub const MAX_PAGE_NAME_CHARS: usize = 50;
pub const PAGE_PATH_PREFIX: &str = "/";
pub const PAGE_PATH_SUFFIX: &str = "-todo";
pub const DEFAULT_PAGE_ICON: &str = "📝";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPageValidationError {
    /// Name is blank after trim.
    EmptyName,
    /// Name exceeds `MAX_PAGE_NAME_CHARS` after trim.
    NameTooLong { chars: usize },
    /// Icon is not exactly one grapheme cluster.
    InvalidIcon(String),
    /// Path lacks the `/` prefix or `-todo` suffix.
    InvalidPath(String),
    /// Candidate is not a JSON object or a field is not a string.
    Malformed(&'static str),
}

impl Display for UserPageValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "page name must not be empty"),
            Self::NameTooLong { chars } => write!(
                f,
                "page name has {chars} characters; at most {MAX_PAGE_NAME_CHARS} allowed"
            ),
            Self::InvalidIcon(icon) => write!(f, "page icon must be one glyph, got `{icon}`"),
            Self::InvalidPath(path) => write!(
                f,
                "page path must look like `{PAGE_PATH_PREFIX}<name>{PAGE_PATH_SUFFIX}`, got `{path}`"
            ),
            Self::Malformed(details) => write!(f, "malformed user page: {details}"),
        }
    }
}

impl Error for UserPageValidationError {}

/// One registered user's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct UserPage {
    pub name: String,
    pub icon: String,
    pub path: String,
}

impl UserPage {
    /// Builds a page for `name`, trimming it and deriving `path`.
    pub fn new(name: &str, icon: &str) -> Result<Self, UserPageValidationError> {
        let page = Self {
            name: name.trim().to_string(),
            icon: icon.to_string(),
            path: derive_page_path(name),
        };
        page.validate()?;
        Ok(page)
    }

    pub fn validate(&self) -> Result<(), UserPageValidationError> {
        check_name(&self.name)?;
        check_icon(&self.icon)?;
        check_path(&self.path)
    }

    /// Builds a page from a raw JSON candidate, rejecting any mismatch.
    pub fn from_json(candidate: &Value) -> Result<Self, UserPageValidationError> {
        let object = candidate
            .as_object()
            .ok_or(UserPageValidationError::Malformed("expected a JSON object"))?;
        let field = |key: &'static str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .ok_or(UserPageValidationError::Malformed(key))
        };

        let page = Self {
            name: field("name")?.to_string(),
            icon: field("icon")?.to_string(),
            path: field("path")?.to_string(),
        };
        page.validate()?;
        Ok(page)
    }
}

impl TryFrom<Value> for UserPage {
    type Error = UserPageValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        UserPage::from_json(&value)
    }
}

/// Returns whether `candidate` is a well-formed user page. Never panics.
pub fn validate_user_page(candidate: &Value) -> bool {
    UserPage::from_json(candidate).is_ok()
}

/// Route path for a page name: lower-cased, whitespace runs hyphenated.
///
/// `"Tanaka Yu"` becomes `/tanaka-yu-todo`.
pub fn derive_page_path(name: &str) -> String {
    format!(
        "{PAGE_PATH_PREFIX}{}{PAGE_PATH_SUFFIX}",
        hyphenate(name).to_lowercase()
    )
}

pub(crate) fn check_name(name: &str) -> Result<(), UserPageValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(UserPageValidationError::EmptyName);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_PAGE_NAME_CHARS {
        return Err(UserPageValidationError::NameTooLong { chars });
    }
    Ok(())
}

pub(crate) fn check_icon(icon: &str) -> Result<(), UserPageValidationError> {
    if icon.graphemes(true).count() != 1 {
        return Err(UserPageValidationError::InvalidIcon(icon.to_string()));
    }
    Ok(())
}

fn check_path(path: &str) -> Result<(), UserPageValidationError> {
    let well_formed = path.len() > PAGE_PATH_PREFIX.len() + PAGE_PATH_SUFFIX.len()
        && path.starts_with(PAGE_PATH_PREFIX)
        && path.ends_with(PAGE_PATH_SUFFIX);
    if !well_formed {
        return Err(UserPageValidationError::InvalidPath(path.to_string()));
    }
    Ok(())
}
