// Database trait — backend-agnostic async interface for all DB operations.
//
// Implementors: SqliteDatabase (wraps rusqlite), PgDatabase (wraps sqlx).
// All methods are async so both sync (rusqlite via Mutex) and native async
// (sqlx) backends fit behind a single interface.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{NewRecord, RiskRecord};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Risk history ---

    /// Persist a new record and return its ID. Records are immutable
    /// after insertion.
    async fn insert_record(&self, record: &NewRecord) -> Result<i64>;

    /// The `limit` most recent records, ordered oldest-first (the series
    /// shape the forecaster consumes).
    async fn get_history(&self, limit: u32) -> Result<Vec<RiskRecord>>;

    /// The `limit` most recent records, ordered newest-first.
    async fn get_recent(&self, limit: u32) -> Result<Vec<RiskRecord>>;

    /// Bulk-clear all records. Returns the number deleted.
    async fn delete_all(&self) -> Result<u64>;

    /// Total number of persisted records.
    async fn count_records(&self) -> Result<i64>;
}
