//! Persistent key-value store port.
//!
//! # Responsibility
//! - Define the narrow `get/set/delete` contract services depend on.
//! - Report writes made by other contexts on the same backing data.
//!
//! # Invariants
//! - Keys and values are UTF-8 strings; values are opaque to the store.
//! - Writes are last-writer-wins; there is no transaction across keys.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json;
pub mod memory;
pub mod sqlite;

pub use json::{read_json_array, write_json, JsonArrayRead};
pub use memory::MemoryStore;
pub use sqlite::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// SQLite query or schema failure.
    Db(DbError),
    /// Value could not be encoded before writing.
    Encode(serde_json::Error),
    /// Backend cannot serve requests (poisoned lock, unmigrated schema).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "cannot encode store value: {err}"),
            Self::Unavailable(reason) => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string key-value storage shared by pages and the registry.
pub trait KvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;
    /// Returns `true` once per batch of writes made through other contexts
    /// since the previous call. Writes made through `self` never count.
    fn take_external_change(&self) -> StoreResult<bool>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn take_external_change(&self) -> StoreResult<bool> {
        (**self).take_external_change()
    }
}
