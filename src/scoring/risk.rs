// Risk score reduction — weighted sum with priority floors.
//
// Certain categories must not be diluted away by averaging across many
// near-zero categories: a high self_harm probability alone has to produce
// a high risk score. The floor branches below implement that policy. The
// divisor and floor constants are fixed policy values, reproduced exactly
// for behavioral parity with the deployed scorer — do not retune them.

use serde::{Deserialize, Serialize};

use crate::labels::{Label, LabelVector};

/// Per-label weights for the risk score reduction. Heavier weight means
/// the category moves the overall score more.
pub fn weight(label: Label) -> f64 {
    match label {
        Label::SelfHarm => 3.0,
        Label::OnlinePredator => 2.0,
        Label::Cyberbullying => 1.5,
        Label::MentalHealthRisk => 1.5,
        Label::Harassment => 1.2,
        Label::SubstanceAbuse => 0.8,
        Label::AdultContent => 0.6,
    }
}

/// Sum of all weights in the table (3.0+2.0+1.5+1.5+1.2+0.8+0.6).
pub const TOTAL_WEIGHT: f64 = 10.6;

/// Floor branch thresholds and values.
const SELF_HARM_TRIGGER: f64 = 0.5;
const SELF_HARM_FLOOR: f64 = 0.7;
const SELF_HARM_DIVISOR: f64 = 0.4;
const MENTAL_HEALTH_TRIGGER: f64 = 0.7;
const MENTAL_HEALTH_FLOOR: f64 = 0.5;
const DEFAULT_DIVISOR: f64 = 0.5;

/// A scalar risk score with the label vector it was derived from.
/// Recomputed per request, never stored on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub label_probs: LabelVector,
}

/// Reduce a label vector to a single risk score in [0,1].
///
/// Weighted sum, then normalization with priority overrides evaluated in
/// order: self-harm above 0.5 guarantees a 0.7 floor with a tighter
/// divisor; mental-health risk above 0.7 guarantees a 0.5 floor; everything
/// else uses plain scaling.
pub fn score(labels: &LabelVector) -> RiskAssessment {
    let weighted_sum: f64 = labels.iter().map(|(l, p)| weight(l) * p).sum();

    let risk_score = if labels.get(Label::SelfHarm) > SELF_HARM_TRIGGER {
        SELF_HARM_FLOOR
            .max(weighted_sum / (TOTAL_WEIGHT * SELF_HARM_DIVISOR))
            .clamp(0.0, 1.0)
    } else if labels.get(Label::MentalHealthRisk) > MENTAL_HEALTH_TRIGGER {
        MENTAL_HEALTH_FLOOR
            .max(weighted_sum / (TOTAL_WEIGHT * DEFAULT_DIVISOR))
            .clamp(0.0, 1.0)
    } else {
        (weighted_sum / (TOTAL_WEIGHT * DEFAULT_DIVISOR)).clamp(0.0, 1.0)
    };

    RiskAssessment {
        risk_score,
        label_probs: *labels,
    }
}

/// The four-level mapping used for forecasting and live display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Strictly ordered thresholds: <0.25 safe, <0.45 medium, <0.7 high.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 0.25 => RiskLevel::Safe,
            s if s < 0.45 => RiskLevel::Medium,
            s if s < 0.7 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The coarser three-level mapping applied when persisting a record.
///
/// Deliberately distinct from RiskLevel — merging the two would silently
/// relabel stored history. See the two call sites before touching either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredLevel {
    Low,
    Medium,
    High,
}

impl StoredLevel {
    /// >=0.7 high, >=0.45 medium, else low.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.7 => StoredLevel::High,
            s if s >= 0.45 => StoredLevel::Medium,
            _ => StoredLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoredLevel::Low => "low",
            StoredLevel::Medium => "medium",
            StoredLevel::High => "high",
        }
    }
}

impl std::fmt::Display for StoredLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_weight_matches_table() {
        let sum: f64 = Label::ALL.iter().map(|&l| weight(l)).sum();
        assert!((sum - TOTAL_WEIGHT).abs() < 1e-10);
    }

    #[test]
    fn test_all_zero_scores_zero() {
        let assessment = score(&LabelVector::zeros());
        assert_eq!(assessment.risk_score, 0.0);
    }

    #[test]
    fn test_self_harm_floor() {
        // Even with every other label at zero, self_harm > 0.5 floors at 0.7.
        let mut labels = LabelVector::zeros();
        labels.set(Label::SelfHarm, 0.51);
        let assessment = score(&labels);
        assert!(
            assessment.risk_score >= 0.7,
            "self_harm > 0.5 must floor the score at 0.7, got {}",
            assessment.risk_score
        );
    }

    #[test]
    fn test_self_harm_at_threshold_does_not_trigger_floor() {
        // The trigger is strict: exactly 0.5 uses the default branch.
        let mut labels = LabelVector::zeros();
        labels.set(Label::SelfHarm, 0.5);
        let assessment = score(&labels);
        // 0.5 * 3.0 / (10.6 * 0.5) = 0.283
        assert!((assessment.risk_score - 1.5 / 5.3).abs() < 1e-10);
    }

    #[test]
    fn test_mental_health_floor() {
        let mut labels = LabelVector::zeros();
        labels.set(Label::MentalHealthRisk, 0.75);
        let assessment = score(&labels);
        assert!(
            assessment.risk_score >= 0.5,
            "mental_health_risk > 0.7 must floor the score at 0.5, got {}",
            assessment.risk_score
        );
    }

    #[test]
    fn test_self_harm_branch_wins_over_mental_health() {
        // Both triggers active: the self-harm branch is evaluated first.
        let mut labels = LabelVector::zeros();
        labels.set(Label::SelfHarm, 0.95);
        labels.set(Label::MentalHealthRisk, 0.9);
        let assessment = score(&labels);
        // sum = 0.95*3.0 + 0.9*1.5 = 4.2; 4.2 / (10.6*0.4) = 0.9906
        assert!((assessment.risk_score - 4.2 / 4.24).abs() < 1e-10);
        assert!(assessment.risk_score >= 0.7);
    }

    #[test]
    fn test_default_branch_scaling() {
        let mut labels = LabelVector::zeros();
        labels.set(Label::Harassment, 0.5);
        let assessment = score(&labels);
        // 0.5 * 1.2 / (10.6 * 0.5) = 0.11320...
        assert!((assessment.risk_score - 0.6 / 5.3).abs() < 1e-10);
    }

    #[test]
    fn test_score_is_monotonic_per_label() {
        for &label in &Label::ALL {
            let mut low = LabelVector::zeros();
            low.set(Label::Harassment, 0.3);
            let mut high = low;
            low.set(label, 0.2);
            high.set(label, 0.8);
            assert!(
                score(&high).risk_score >= score(&low).risk_score,
                "raising {label} must not lower the risk score"
            );
        }
    }

    #[test]
    fn test_score_clamped_to_unit_interval() {
        let mut labels = LabelVector::zeros();
        for label in Label::ALL {
            labels.set(label, 1.0);
        }
        let assessment = score(&labels);
        assert_eq!(assessment.risk_score, 1.0);
    }

    #[test]
    fn test_score_is_idempotent() {
        let mut labels = LabelVector::zeros();
        labels.set(Label::Cyberbullying, 0.92);
        labels.set(Label::SubstanceAbuse, 0.6);
        let first = score(&labels);
        let second = score(&labels);
        assert_eq!(first.risk_score, second.risk_score);
        assert_eq!(first.label_probs, second.label_probs);
    }

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_score(0.24), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_score(0.25), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.44), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.45), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.69), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.7), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::Critical);
    }

    #[test]
    fn test_stored_level_thresholds() {
        assert_eq!(StoredLevel::from_score(0.0), StoredLevel::Low);
        assert_eq!(StoredLevel::from_score(0.44), StoredLevel::Low);
        assert_eq!(StoredLevel::from_score(0.45), StoredLevel::Medium);
        assert_eq!(StoredLevel::from_score(0.69), StoredLevel::Medium);
        assert_eq!(StoredLevel::from_score(0.7), StoredLevel::High);
    }

    #[test]
    fn test_the_two_mappings_stay_distinct() {
        // 0.2 is "safe" in the four-level scale but "low" in storage;
        // 0.3 is "medium" in the four-level scale but still "low" in storage.
        assert_eq!(RiskLevel::from_score(0.3), RiskLevel::Medium);
        assert_eq!(StoredLevel::from_score(0.3), StoredLevel::Low);
    }
}
