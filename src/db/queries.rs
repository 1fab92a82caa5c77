// Database queries — CRUD operations for the risk history table.
//
// Every SQLite interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust
// interfaces.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::models::{NewRecord, RiskRecord};

/// Insert a new record and return its ID. The timestamp comes from the
/// database (UTC), so rows are ordered by insertion.
pub fn insert_record(conn: &Connection, record: &NewRecord) -> Result<i64> {
    let label_probs_json = serde_json::to_string(&record.label_probs)?;
    let meta_json = record
        .meta
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO risk_history (timestamp, message, sender, risk_level, risk_score, label_probs, meta)
         VALUES (datetime('now'), ?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.message,
            record.sender,
            record.risk_level.as_str(),
            record.risk_score,
            label_probs_json,
            meta_json,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// The `limit` most recent records, oldest-first — the shape the
/// forecaster wants (an ordered series ending at the present).
pub fn get_history(conn: &Connection, limit: u32) -> Result<Vec<RiskRecord>> {
    let mut records = get_recent(conn, limit)?;
    records.reverse();
    Ok(records)
}

/// The `limit` most recent records, newest-first.
pub fn get_recent(conn: &Connection, limit: u32) -> Result<Vec<RiskRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, timestamp, message, sender, risk_level, risk_score, label_probs, meta
         FROM risk_history
         ORDER BY timestamp DESC, id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], row_to_record)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Remove every record. Returns the number of rows deleted.
pub fn delete_all(conn: &Connection) -> Result<u64> {
    let deleted = conn.execute("DELETE FROM risk_history", [])?;
    Ok(deleted as u64)
}

/// Total number of persisted records.
pub fn count_records(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM risk_history", [], |row| row.get(0))?;
    Ok(count)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<RiskRecord> {
    let timestamp: String = row.get(1)?;
    let label_probs_json: Option<String> = row.get(6)?;
    let meta_json: Option<String> = row.get(7)?;

    Ok(RiskRecord {
        id: row.get(0)?,
        timestamp: parse_db_timestamp(&timestamp),
        message: row.get(2)?,
        sender: row.get(3)?,
        risk_level: row.get(4)?,
        risk_score: row.get(5)?,
        label_probs: label_probs_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default(),
        meta: meta_json.as_deref().and_then(|s| serde_json::from_str(s).ok()),
    })
}

/// Parse SQLite's `datetime('now')` format, tolerating RFC 3339 for rows
/// written by other tools. Unparseable values collapse to the epoch
/// rather than failing the whole query.
fn parse_db_timestamp(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|n| n.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|t| t.with_timezone(&Utc)))
        .unwrap_or_else(|_| DateTime::<Utc>::UNIX_EPOCH)
}
