//! SQLite-backed store.
//!
//! # Invariants
//! - The connection must already be migrated (see `db::open_db`).
//! - External writes are detected through `PRAGMA data_version`, which only
//!   moves for commits made by other connections.

use super::{KvStore, StoreError, StoreResult};
use crate::db::migrations::{latest_version, schema_version};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::Cell;

pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
    data_version: Cell<i64>,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `StoreError::Unavailable` when the schema is missing or outdated.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let version = schema_version(conn)?;
        if version != latest_version() {
            return Err(StoreError::Unavailable(format!(
                "store schema version {version}, expected {}",
                latest_version()
            )));
        }
        Ok(Self {
            conn,
            data_version: Cell::new(read_data_version(conn)?),
        })
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn take_external_change(&self) -> StoreResult<bool> {
        let current = read_data_version(self.conn)?;
        Ok(self.data_version.replace(current) != current)
    }
}

fn read_data_version(conn: &Connection) -> StoreResult<i64> {
    Ok(conn.query_row("PRAGMA data_version;", [], |row| row.get(0))?)
}
