//! Core logic for todopad: per-user task lists and the page registry that
//! hosts them.
//! This crate is the single source of truth for task and page invariants.

pub mod config;
pub mod db;
pub mod filter;
pub mod logging;
pub mod model;
pub mod routing;
pub mod service;
pub mod store;

pub use config::{RegistryConfig, DEFAULT_REGISTRY_KEY};
pub use filter::{compute_stats, filter_tasks, TaskFilter, TaskStats, UnknownTaskFilter};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::storage_key::{generate_storage_key, StorageKey, StorageKeyError};
pub use model::task::{
    create_task_item, validate_task_item, TaskId, TaskItem, TaskValidationError,
    MAX_TASK_TEXT_CHARS,
};
pub use model::user_page::{
    derive_page_path, validate_user_page, UserPage, UserPageValidationError, DEFAULT_PAGE_ICON,
};
pub use routing::{PageRoute, RouteMatch, RouteTable, HOME_PATH};
pub use service::page_registry::{
    ChangeListener, RegistryError, RegistryResult, SubscriptionId, UserPageRegistry,
};
pub use service::task_list::{TaskListError, TaskListResult, TaskListService};
pub use store::{KvStore, MemoryStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for linkage checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
