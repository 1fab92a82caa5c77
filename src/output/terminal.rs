// Colored terminal output for assessments, forecasts, and history.
//
// This module handles all terminal-specific formatting: colors, tables,
// summaries. The main.rs display paths delegate here.

use colored::Colorize;

use crate::db::models::RiskRecord;
use crate::forecast::ForecastPoint;
use crate::labels::LabelVector;
use crate::scoring::{RiskAssessment, RiskLevel};

/// Display a conversation assessment: the scalar score, its live level,
/// and the per-label breakdown sorted by probability.
pub fn display_assessment(assessment: &RiskAssessment) {
    let level = RiskLevel::from_score(assessment.risk_score);

    println!("\n{}", "=== Risk Assessment ===".bold());
    println!(
        "  Risk score: {:.2}  [{}]",
        assessment.risk_score,
        colorize_level(level.as_str())
    );

    println!("\n  Label probabilities:");
    let mut labels: Vec<_> = assessment.label_probs.iter().collect();
    labels.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (label, prob) in labels {
        let bar_len = (prob * 20.0).round() as usize;
        println!(
            "    {:<20} {:>5.2}  {}",
            label.as_str(),
            prob,
            "#".repeat(bar_len).dimmed()
        );
    }
}

/// Display per-message fused vectors for a multi-message conversation.
pub fn display_per_message(messages: &[(String, LabelVector)]) {
    if messages.len() < 2 {
        return;
    }
    println!("\n  Per-message signals:");
    for (text, labels) in messages {
        let top = labels
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .filter(|(_, p)| *p > 0.0);
        let preview = super::truncate_chars(text, 50);
        match top {
            Some((label, prob)) => {
                println!("    \"{}\" → {} {:.2}", preview.dimmed(), label, prob)
            }
            None => println!("    \"{}\" → no signal", preview.dimmed()),
        }
    }
}

/// Display a forecast as a step table.
pub fn display_forecast(points: &[ForecastPoint]) {
    if points.is_empty() {
        println!("No forecast produced (horizon 0).");
        return;
    }

    println!("\n{}", "=== Risk Forecast ===".bold());
    println!(
        "  {:>4}  {:>6}  {:<8}",
        "Step".dimmed(),
        "Score".dimmed(),
        "Level".dimmed()
    );
    for p in points {
        println!(
            "  {:>4}  {:>6.2}  {:<8}",
            p.step,
            p.score,
            colorize_level(p.risk_level.as_str())
        );
    }
}

/// Display recent history, newest-first.
pub fn display_history(records: &[RiskRecord]) {
    if records.is_empty() {
        println!("No history yet. Run `palisade score <text>` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Risk History ({} records) ===", records.len()).bold()
    );
    for r in records {
        let preview = r
            .message
            .as_deref()
            .map(|m| super::truncate_chars(m, 60))
            .unwrap_or_else(|| "(no message stored)".to_string());
        println!(
            "  {}  {:>5.2}  {:<7}  {}",
            r.timestamp.format("%Y-%m-%d %H:%M"),
            r.risk_score,
            colorize_level(&r.risk_level),
            preview.dimmed()
        );
    }
}

/// Colorize a risk level string (works for both level scales).
fn colorize_level(level: &str) -> colored::ColoredString {
    match level {
        "critical" => level.red().bold(),
        "high" => level.bright_red(),
        "medium" => level.yellow(),
        "low" | "safe" => level.green(),
        _ => level.dimmed(),
    }
}
