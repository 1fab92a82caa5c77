// Unit tests for the scoring surface.
//
// Tests isolated pure functions: RiskLevel / StoredLevel boundary
// conditions, the weighted-sum reduction with its priority floors, and
// the keyword heuristics feeding it.

use palisade::classify::keywords::keyword_probabilities;
use palisade::labels::{Label, LabelVector};
use palisade::scoring::{score, RiskLevel, StoredLevel};

// ============================================================
// RiskLevel::from_score — boundary conditions
// ============================================================

#[test]
fn level_just_below_medium() {
    assert_eq!(RiskLevel::from_score(0.2499), RiskLevel::Safe);
}

#[test]
fn level_exact_boundary_medium() {
    assert_eq!(RiskLevel::from_score(0.25), RiskLevel::Medium);
}

#[test]
fn level_exact_boundary_high() {
    assert_eq!(RiskLevel::from_score(0.45), RiskLevel::High);
}

#[test]
fn level_exact_boundary_critical() {
    assert_eq!(RiskLevel::from_score(0.7), RiskLevel::Critical);
}

#[test]
fn level_zero_is_safe() {
    assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Safe);
}

#[test]
fn level_one_is_critical() {
    assert_eq!(RiskLevel::from_score(1.0), RiskLevel::Critical);
}

#[test]
fn level_nan_falls_to_critical() {
    // NaN fails every < comparison, so it falls through to the last arm.
    assert_eq!(RiskLevel::from_score(f64::NAN), RiskLevel::Critical);
}

// ============================================================
// StoredLevel::from_score — the coarser persistence mapping
// ============================================================

#[test]
fn stored_exact_boundary_high() {
    assert_eq!(StoredLevel::from_score(0.7), StoredLevel::High);
}

#[test]
fn stored_just_below_high() {
    assert_eq!(StoredLevel::from_score(0.6999), StoredLevel::Medium);
}

#[test]
fn stored_exact_boundary_medium() {
    assert_eq!(StoredLevel::from_score(0.45), StoredLevel::Medium);
}

#[test]
fn stored_just_below_medium() {
    assert_eq!(StoredLevel::from_score(0.4499), StoredLevel::Low);
}

#[test]
fn the_two_mappings_disagree_between_045_and_07() {
    // 0.5 is "high" live but only "medium" when stored. That asymmetry is
    // load-bearing for existing history rows.
    assert_eq!(RiskLevel::from_score(0.5), RiskLevel::High);
    assert_eq!(StoredLevel::from_score(0.5), StoredLevel::Medium);
}

// ============================================================
// score() — priority floors through the public surface
// ============================================================

#[test]
fn self_harm_alone_floors_at_seventy_percent() {
    let mut labels = LabelVector::zeros();
    labels.set(Label::SelfHarm, 0.55);
    assert!(score(&labels).risk_score >= 0.7);
}

#[test]
fn mental_health_alone_floors_at_fifty_percent() {
    let mut labels = LabelVector::zeros();
    labels.set(Label::MentalHealthRisk, 0.75);
    assert!(score(&labels).risk_score >= 0.5);
}

#[test]
fn self_harm_branch_wins_over_mental_health_branch() {
    // Both triggers active: the self-harm branch is evaluated first and
    // its tighter divisor produces the larger score.
    let mut labels = LabelVector::zeros();
    labels.set(Label::SelfHarm, 0.9);
    labels.set(Label::MentalHealthRisk, 0.9);
    let s = score(&labels).risk_score;

    let mut mh_only = LabelVector::zeros();
    mh_only.set(Label::MentalHealthRisk, 0.9);
    assert!(s >= score(&mh_only).risk_score);
}

#[test]
fn all_labels_maxed_clamps_to_one() {
    let mut labels = LabelVector::zeros();
    for label in Label::ALL {
        labels.set(label, 1.0);
    }
    assert_eq!(score(&labels).risk_score, 1.0);
}

#[test]
fn low_grade_noise_stays_safe() {
    let mut labels = LabelVector::zeros();
    for label in Label::ALL {
        labels.set(label, 0.05);
    }
    let s = score(&labels).risk_score;
    assert_eq!(RiskLevel::from_score(s), RiskLevel::Safe);
}

// ============================================================
// Keyword heuristics feeding the score
// ============================================================

#[test]
fn self_harm_phrase_scores_critical() {
    let labels = keyword_probabilities("i want to kill myself");
    let s = score(&labels).risk_score;
    assert_eq!(RiskLevel::from_score(s), RiskLevel::Critical);
}

#[test]
fn bullying_phrase_scores_medium() {
    // 0.92 * 1.5 / (10.6 * 0.5) ≈ 0.26 — enough to leave Safe, but a
    // single bullying signal alone does not reach High.
    let labels = keyword_probabilities("everyone at school keeps bullying me");
    let s = score(&labels).risk_score;
    assert_eq!(RiskLevel::from_score(s), RiskLevel::Medium);
}

#[test]
fn benign_text_scores_safe() {
    let labels = keyword_probabilities("see you at practice tomorrow");
    assert_eq!(labels, LabelVector::zeros());
    assert_eq!(score(&labels).risk_score, 0.0);
}

#[test]
fn keyword_matching_is_case_insensitive() {
    let upper = keyword_probabilities("I WANT TO KILL MYSELF");
    let lower = keyword_probabilities("i want to kill myself");
    assert_eq!(upper, lower);
}
