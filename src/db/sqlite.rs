// SqliteDatabase — rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is
// !Send. Trait methods lock the mutex, do synchronous rusqlite work, and
// return. The lock is never held across .await points — Rust enforces
// this because MutexGuard is !Send.
//
// The free functions in queries.rs remain available so tests can work
// against a Connection directly.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{NewRecord, RiskRecord};
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn insert_record(&self, record: &NewRecord) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::insert_record(&conn, record)
    }

    async fn get_history(&self, limit: u32) -> Result<Vec<RiskRecord>> {
        let conn = self.conn.lock().await;
        super::queries::get_history(&conn, limit)
    }

    async fn get_recent(&self, limit: u32) -> Result<Vec<RiskRecord>> {
        let conn = self.conn.lock().await;
        super::queries::get_recent(&conn, limit)
    }

    async fn delete_all(&self) -> Result<u64> {
        let conn = self.conn.lock().await;
        super::queries::delete_all(&conn)
    }

    async fn count_records(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::count_records(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use crate::labels::{Label, LabelVector};
    use crate::scoring::StoredLevel;

    async fn test_db() -> SqliteDatabase {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteDatabase::new(conn)
    }

    fn record(score: f64) -> NewRecord {
        let mut labels = LabelVector::zeros();
        labels.set(Label::SelfHarm, score);
        NewRecord {
            message: Some("test message".to_string()),
            sender: Some("other".to_string()),
            risk_level: StoredLevel::from_score(score),
            risk_score: score,
            label_probs: labels,
            meta: None,
        }
    }

    #[tokio::test]
    async fn test_trait_insert_and_history_roundtrip() {
        let db = test_db().await;
        let id = db.insert_record(&record(0.75)).await.unwrap();
        assert!(id > 0);

        let history = db.get_history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].risk_level, "high");
        assert_eq!(history[0].label_probs.get(Label::SelfHarm), 0.75);
    }

    #[tokio::test]
    async fn test_trait_ordering_contract() {
        let db = test_db().await;
        for score in [0.1, 0.5, 0.9] {
            db.insert_record(&record(score)).await.unwrap();
        }

        let oldest_first: Vec<f64> = db
            .get_history(10)
            .await
            .unwrap()
            .iter()
            .map(|r| r.risk_score)
            .collect();
        assert_eq!(oldest_first, vec![0.1, 0.5, 0.9]);

        let newest_first: Vec<f64> = db
            .get_recent(10)
            .await
            .unwrap()
            .iter()
            .map(|r| r.risk_score)
            .collect();
        assert_eq!(newest_first, vec![0.9, 0.5, 0.1]);
    }

    #[tokio::test]
    async fn test_trait_delete_all() {
        let db = test_db().await;
        db.insert_record(&record(0.2)).await.unwrap();
        db.insert_record(&record(0.4)).await.unwrap();

        assert_eq!(db.delete_all().await.unwrap(), 2);
        assert_eq!(db.count_records().await.unwrap(), 0);
        assert!(db.get_history(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trait_table_count() {
        let db = test_db().await;
        assert_eq!(db.table_count().await.unwrap(), 2);
    }
}
