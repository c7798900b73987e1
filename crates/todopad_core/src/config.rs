//! Registry configuration.
//!
//! # Invariants
//! - `default_pages` is the built-in list every registry starts from; it
//!   wins over persisted entries with the same name.

use crate::model::user_page::{UserPage, DEFAULT_PAGE_ICON};

/// Store key holding the persisted page list.
pub const DEFAULT_REGISTRY_KEY: &str = "userPages";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub registry_key: String,
    pub default_icon: String,
    pub default_pages: Vec<UserPage>,
}

impl RegistryConfig {
    /// Same settings with no built-in pages.
    pub fn without_default_pages(self) -> Self {
        Self {
            default_pages: Vec::new(),
            ..self
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_key: DEFAULT_REGISTRY_KEY.to_string(),
            default_icon: DEFAULT_PAGE_ICON.to_string(),
            default_pages: vec![UserPage {
                name: "TestUser".to_string(),
                icon: DEFAULT_PAGE_ICON.to_string(),
                path: "/testuser-todo".to_string(),
            }],
        }
    }
}
