//! JSON array values stored under one key.

use super::{KvStore, StoreError, StoreResult};
use serde::Serialize;
use serde_json::Value;

/// Outcome of reading a JSON array value.
#[derive(Debug)]
pub enum JsonArrayRead {
    Missing,
    /// Stored text is not a JSON array; callers recover locally.
    Corrupt(String),
    Items(Vec<Value>),
}

/// Reads `key` as a JSON array without validating its elements.
pub fn read_json_array(store: &impl KvStore, key: &str) -> StoreResult<JsonArrayRead> {
    let Some(raw) = store.get(key)? else {
        return Ok(JsonArrayRead::Missing);
    };
    Ok(match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(items) => JsonArrayRead::Items(items),
        Err(err) => JsonArrayRead::Corrupt(err.to_string()),
    })
}

/// Serializes `value` and stores it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &impl KvStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let encoded = serde_json::to_string(value).map_err(StoreError::Encode)?;
    store.set(key, &encoded)
}
