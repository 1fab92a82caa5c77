// Data models — Rust structs that map to database rows.
//
// These are the types that flow through the application. They're separate
// from the database queries so other modules can use them without
// depending on rusqlite directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::labels::LabelVector;
use crate::scoring::StoredLevel;

/// A persisted risk assessment. Immutable after insertion; removed only
/// by bulk clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub message: Option<String>,
    pub sender: Option<String>,
    /// Three-level stored mapping (low/medium/high) as a string, exactly
    /// as written at insert time.
    pub risk_level: String,
    pub risk_score: f64,
    pub label_probs: LabelVector,
    /// Free-form metadata (JSON) attached by the caller.
    pub meta: Option<serde_json::Value>,
}

/// Fields for a new record. The timestamp is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub message: Option<String>,
    pub sender: Option<String>,
    pub risk_level: StoredLevel,
    pub risk_score: f64,
    pub label_probs: LabelVector,
    pub meta: Option<serde_json::Value>,
}

impl NewRecord {
    /// Build a record from a scored aggregate, deriving the stored level
    /// from the score.
    pub fn from_assessment(
        message: Option<String>,
        sender: Option<String>,
        risk_score: f64,
        label_probs: LabelVector,
    ) -> Self {
        Self {
            message,
            sender,
            risk_level: StoredLevel::from_score(risk_score),
            risk_score,
            label_probs,
            meta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_assessment_derives_stored_level() {
        let rec = NewRecord::from_assessment(Some("hi".into()), None, 0.82, LabelVector::zeros());
        assert_eq!(rec.risk_level, StoredLevel::High);

        let rec = NewRecord::from_assessment(None, None, 0.5, LabelVector::zeros());
        assert_eq!(rec.risk_level, StoredLevel::Medium);

        let rec = NewRecord::from_assessment(None, None, 0.1, LabelVector::zeros());
        assert_eq!(rec.risk_level, StoredLevel::Low);
    }
}
