//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todopad_core` linkage.
//! - Print the route table of a store: an SQLite file given as the first
//!   argument, or a fresh in-memory store.
//! - Write core logs under `$TMPDIR/todopad-logs`.

use std::path::PathBuf;
use std::process::ExitCode;
use todopad_core::db::{open_db, open_db_in_memory};
use todopad_core::{RegistryConfig, RouteTable, SqliteKvStore, UserPageRegistry};

fn main() -> ExitCode {
    println!("todopad_core ping={}", todopad_core::ping());
    println!("todopad_core version={}", todopad_core::core_version());

    let log_dir = log_dir();
    if let Err(err) =
        todopad_core::init_logging(todopad_core::default_log_level(), &log_dir.to_string_lossy())
    {
        eprintln!("todopad_cli logging=disabled error={err}");
    }

    match print_routes(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("todopad_cli error={err}");
            ExitCode::FAILURE
        }
    }
}

fn log_dir() -> PathBuf {
    std::env::temp_dir().join("todopad-logs")
}

fn print_routes(db_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let conn = match db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let store = SqliteKvStore::try_new(&conn)?;
    let registry = UserPageRegistry::open(store, RegistryConfig::default())?;

    for route in RouteTable::from_pages(registry.pages()).routes() {
        println!("route {} {} {}", route.path, route.icon, route.page_name);
    }
    Ok(())
}
