use rusqlite::Connection;
use todopad_core::db::migrations::latest_version;
use todopad_core::db::{open_db, open_db_in_memory};
use todopad_core::{KvStore, MemoryStore, SqliteKvStore, StoreError};

fn exercise_crud(store: &impl KvStore) {
    assert_eq!(store.get("missing").unwrap(), None);

    store.set("userPages", "[]").unwrap();
    store.set("userPages", r#"[{"name":"Tanaka"}]"#).unwrap();
    assert_eq!(
        store.get("userPages").unwrap().as_deref(),
        Some(r#"[{"name":"Tanaka"}]"#)
    );

    store.set("田中-todos", "[]").unwrap();
    assert_eq!(store.get("田中-todos").unwrap().as_deref(), Some("[]"));

    store.delete("userPages").unwrap();
    store.delete("userPages").unwrap();
    assert_eq!(store.get("userPages").unwrap(), None);
}

#[test]
fn memory_store_supports_crud() {
    exercise_crud(&MemoryStore::new());
}

#[test]
fn sqlite_store_supports_crud() {
    let conn = open_db_in_memory().unwrap();
    exercise_crud(&SqliteKvStore::try_new(&conn).unwrap());
}

#[test]
fn sqlite_store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKvStore::try_new(&conn).err().unwrap();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[test]
fn open_db_records_latest_schema_version() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn open_db_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = open_db(&db_path).unwrap_err();
    assert!(err.to_string().contains("newer than supported"));
}

#[test]
fn memory_contexts_see_each_others_writes() {
    let first = MemoryStore::new();
    let second = first.connect().unwrap();
    let third = first.connect().unwrap();

    first.set("userPages", "[]").unwrap();

    assert_eq!(second.get("userPages").unwrap().as_deref(), Some("[]"));
    assert!(!first.take_external_change().unwrap());
    assert!(second.take_external_change().unwrap());
    assert!(!second.take_external_change().unwrap());
    assert!(third.take_external_change().unwrap());

    second.delete("missing").unwrap();
    assert!(!first.take_external_change().unwrap());
    second.delete("userPages").unwrap();
    assert!(first.take_external_change().unwrap());
}

#[test]
fn sqlite_connections_see_each_others_writes() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shared.sqlite3");
    let conn_a = open_db(&db_path).unwrap();
    let conn_b = open_db(&db_path).unwrap();
    let store_a = SqliteKvStore::try_new(&conn_a).unwrap();
    let store_b = SqliteKvStore::try_new(&conn_b).unwrap();

    store_a.set("Tanaka-todos", "[]").unwrap();

    assert_eq!(store_b.get("Tanaka-todos").unwrap().as_deref(), Some("[]"));
    assert!(!store_a.take_external_change().unwrap());
    assert!(store_b.take_external_change().unwrap());
    assert!(!store_b.take_external_change().unwrap());
}
