// PgDatabase — PostgreSQL backend implementing the Database trait.
//
// Uses sqlx PgPool for native async queries. All queries use runtime
// parameter binding (not compile-time macros) to avoid requiring
// DATABASE_URL at compile time.
//
// Key differences from SQLite:
// - TIMESTAMPTZ instead of TEXT for timestamps
// - JSONB instead of TEXT for structured data
// - $1/$2 parameter syntax (handled by sqlx)
// - GENERATED ALWAYS AS IDENTITY for auto-increment

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx_core::pool::Pool;
use sqlx_core::row::Row;
use sqlx_postgres::{PgRow, Postgres};

use super::models::{NewRecord, RiskRecord};
use super::traits::Database;

/// Type alias for the PostgreSQL connection pool.
pub type PgPool = Pool<Postgres>;

pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Connect to PostgreSQL and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to PostgreSQL at {database_url}"))?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run all pending migrations.
    ///
    /// Acquires a Postgres session-level advisory lock so that concurrent
    /// processes (e.g. two app instances starting together) don't race to
    /// apply the same migration. Session-level advisory locks are bound to
    /// the backend session that acquired them, so the lock and unlock run
    /// on a dedicated connection held for the duration of the loop.
    async fn run_migrations(&self) -> Result<()> {
        // 0x50414C4953414445 = ASCII "PALISADE" as a big-endian i64.
        // Used as the advisory lock key to namespace this lock.
        const MIGRATION_LOCK_KEY: i64 = 0x50414C4953414445_u64 as i64;

        let mut lock_conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection for migration advisory lock")?;

        sqlx_core::query::query("SELECT pg_advisory_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *lock_conn)
            .await
            .context("Failed to acquire migration advisory lock")?;

        let migration_result: Result<()> = async {
            // Ensure schema_version table exists (idempotent DDL)
            sqlx_core::query::query(
                "CREATE TABLE IF NOT EXISTS schema_version (
                    version INTEGER PRIMARY KEY,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )",
            )
            .execute(&self.pool)
            .await?;

            let migrations = [(
                1,
                include_str!("../../migrations/postgres/0001_initial.sql"),
            )];

            for (version, sql) in migrations {
                let applied: bool = sqlx_core::query::query(
                    "SELECT COUNT(*) > 0 FROM schema_version WHERE version = $1",
                )
                .bind(version)
                .fetch_one(&self.pool)
                .await
                .map(|row| row.get::<bool, _>(0))
                .unwrap_or(false);

                if !applied {
                    for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
                        sqlx_core::query::query(statement)
                            .execute(&self.pool)
                            .await
                            .with_context(|| format!("Migration v{version} failed"))?;
                    }
                    sqlx_core::query::query("INSERT INTO schema_version (version) VALUES ($1)")
                        .bind(version)
                        .execute(&self.pool)
                        .await?;
                }
            }

            Ok(())
        }
        .await;

        // Always release the lock, then surface any migration error.
        sqlx_core::query::query("SELECT pg_advisory_unlock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *lock_conn)
            .await
            .context("Failed to release migration advisory lock")?;

        migration_result
    }
}

fn row_to_record(row: &PgRow) -> RiskRecord {
    let label_probs: Option<serde_json::Value> = row.get("label_probs");
    RiskRecord {
        id: row.get::<i64, _>("id"),
        timestamp: row.get::<DateTime<Utc>, _>("timestamp"),
        message: row.get("message"),
        sender: row.get("sender"),
        risk_level: row.get("risk_level"),
        risk_score: row.get::<f64, _>("risk_score"),
        label_probs: label_probs
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default(),
        meta: row.get("meta"),
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn table_count(&self) -> Result<i64> {
        let row = sqlx_core::query::query(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>(0))
    }

    async fn insert_record(&self, record: &NewRecord) -> Result<i64> {
        let label_probs = serde_json::to_value(record.label_probs)?;
        let row = sqlx_core::query::query(
            "INSERT INTO risk_history (message, sender, risk_level, risk_score, label_probs, meta)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(record.message.as_deref())
        .bind(record.sender.as_deref())
        .bind(record.risk_level.as_str())
        .bind(record.risk_score)
        .bind(label_probs)
        .bind(record.meta.clone())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert risk record")?;

        Ok(row.get::<i64, _>(0))
    }

    async fn get_history(&self, limit: u32) -> Result<Vec<RiskRecord>> {
        let mut records = self.get_recent(limit).await?;
        records.reverse();
        Ok(records)
    }

    async fn get_recent(&self, limit: u32) -> Result<Vec<RiskRecord>> {
        let rows = sqlx_core::query::query(
            "SELECT id, timestamp, message, sender, risk_level, risk_score, label_probs, meta
             FROM risk_history
             ORDER BY timestamp DESC, id DESC
             LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch risk history")?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx_core::query::query("DELETE FROM risk_history")
            .execute(&self.pool)
            .await
            .context("Failed to clear risk history")?;
        Ok(result.rows_affected())
    }

    async fn count_records(&self) -> Result<i64> {
        let row = sqlx_core::query::query("SELECT COUNT(*) FROM risk_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>(0))
    }
}
