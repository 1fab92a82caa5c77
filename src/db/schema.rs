// Database schema — table creation and migrations.
//
// We use a simple version-based migration approach: a `schema_version`
// table tracks which migrations have run, and each migration is a
// function that executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per scored conversation (the last message of the batch)
        CREATE TABLE IF NOT EXISTS risk_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL DEFAULT (datetime('now')),
            message TEXT,                      -- last message text (may be withheld)
            sender TEXT,
            risk_level TEXT NOT NULL,          -- low / medium / high (stored mapping)
            risk_score REAL NOT NULL,          -- 0.0 to 1.0
            label_probs TEXT,                  -- JSON object, label name -> probability
            meta TEXT                          -- free-form JSON metadata
        );

        -- Index for history queries (always ordered by time)
        CREATE INDEX IF NOT EXISTS idx_history_timestamp
            ON risk_history(timestamp);

        -- Index for level/score filtering in stats
        CREATE INDEX IF NOT EXISTS idx_history_level_score
            ON risk_history(risk_level, risk_score);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
#[allow(dead_code)]
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
