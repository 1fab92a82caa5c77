// Aggregate statistics over persisted risk history.
//
// Pure computation over an oldest-first record slice — no DB access here,
// so the same function backs the CLI and the web handler. Scores are
// reported as percentages because that's what the dashboards chart.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::db::models::RiskRecord;
use crate::labels::Label;

/// How many of the most recent records the timeline includes.
const TIMELINE_LEN: usize = 60;

/// Window for the per-day averages.
const DAILY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct TimelinePoint {
    pub timestamp: DateTime<Utc>,
    /// Risk score as a percentage (0–100).
    pub score: f64,
    pub level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    /// Count of records per stored risk level.
    pub risk_level_distribution: BTreeMap<String, u64>,
    /// The last 60 records, oldest-first, scores as percentages.
    pub risk_score_timeline: Vec<TimelinePoint>,
    /// Mean probability per label, as percentages.
    pub label_distribution: BTreeMap<String, f64>,
    /// Mean score percentage per day (YYYY-MM-DD) over the last 7 days.
    pub daily_risk_averages: BTreeMap<String, f64>,
    pub total_predictions: usize,
    /// Mean risk score as a percentage, rounded to 2 decimals.
    pub average_risk_score: f64,
}

impl StatsSummary {
    pub fn empty() -> Self {
        Self {
            risk_level_distribution: BTreeMap::new(),
            risk_score_timeline: Vec::new(),
            label_distribution: BTreeMap::new(),
            daily_risk_averages: BTreeMap::new(),
            total_predictions: 0,
            average_risk_score: 0.0,
        }
    }
}

/// Compute summary statistics for an oldest-first record slice.
pub fn compute(records: &[RiskRecord]) -> StatsSummary {
    compute_at(records, Utc::now())
}

/// Like `compute`, with an explicit "now" for the 7-day window.
pub fn compute_at(records: &[RiskRecord], now: DateTime<Utc>) -> StatsSummary {
    if records.is_empty() {
        return StatsSummary::empty();
    }

    let mut risk_level_distribution: BTreeMap<String, u64> = BTreeMap::new();
    for r in records {
        *risk_level_distribution
            .entry(r.risk_level.clone())
            .or_insert(0) += 1;
    }

    let timeline_start = records.len().saturating_sub(TIMELINE_LEN);
    let risk_score_timeline: Vec<TimelinePoint> = records[timeline_start..]
        .iter()
        .map(|r| TimelinePoint {
            timestamp: r.timestamp,
            score: r.risk_score * 100.0,
            level: r.risk_level.clone(),
        })
        .collect();

    let mut label_distribution: BTreeMap<String, f64> = BTreeMap::new();
    for label in Label::ALL {
        let mean: f64 = records
            .iter()
            .map(|r| r.label_probs.get(label) * 100.0)
            .sum::<f64>()
            / records.len() as f64;
        label_distribution.insert(label.as_str().to_string(), mean);
    }

    let window_start = now - Duration::days(DAILY_WINDOW_DAYS);
    let mut daily: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    for r in records.iter().filter(|r| r.timestamp > window_start) {
        let day = r.timestamp.format("%Y-%m-%d").to_string();
        let entry = daily.entry(day).or_insert((0.0, 0));
        entry.0 += r.risk_score * 100.0;
        entry.1 += 1;
    }
    let daily_risk_averages = daily
        .into_iter()
        .map(|(day, (sum, n))| (day, sum / n as f64))
        .collect();

    let total_predictions = records.len();
    let average_risk_score = records.iter().map(|r| r.risk_score).sum::<f64>()
        / total_predictions as f64
        * 100.0;

    StatsSummary {
        risk_level_distribution,
        risk_score_timeline,
        label_distribution,
        daily_risk_averages,
        total_predictions,
        average_risk_score: (average_risk_score * 100.0).round() / 100.0,
    }
}
