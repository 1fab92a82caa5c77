// Database layer — risk history persistence.
//
// Default backend is SQLite via rusqlite with the "bundled" feature so
// there's no system SQLite dependency. The file lives wherever
// PALISADE_DB_PATH points (defaults to ./palisade.db). A PostgreSQL
// backend (feature `postgres`) implements the same Database trait.

pub mod models;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod queries;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use traits::Database;

#[cfg(feature = "sqlite")]
use anyhow::{Context, Result};
#[cfg(feature = "sqlite")]
use rusqlite::Connection;
#[cfg(feature = "sqlite")]
use std::path::Path;

/// Open (or create) the SQLite database and run migrations.
///
/// This is the main entry point — called by `palisade init` and by any
/// command that needs database access.
#[cfg(feature = "sqlite")]
pub fn initialize(db_path: &str) -> Result<Connection> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    // Enable WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Run schema creation / migrations
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing SQLite database (fails if it doesn't exist yet).
#[cfg(feature = "sqlite")]
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run `palisade init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(conn)
}
