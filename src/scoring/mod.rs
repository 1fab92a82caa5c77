// Risk scoring — reduction of label vectors to a scalar score and the
// score-to-level mappings.

pub mod risk;

pub use risk::{score, RiskAssessment, RiskLevel, StoredLevel};
