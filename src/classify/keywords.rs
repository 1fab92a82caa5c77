// Keyword heuristics — the deterministic half of risk fusion.
//
// Curated English phrase lists per category with fixed probabilities.
// These constants are policy, not tuning knobs: the fusion contract is
// that an obvious phrase always produces at least this much signal, no
// matter what the model says. Matching is case-insensitive substring.

use crate::labels::{Label, LabelVector};

/// Self-harm phrases. "suicid" intentionally catches suicide/suicidal.
const SELF_HARM_PHRASES: &[&str] = &[
    "suicid",
    "end it",
    "kill myself",
    "end it all",
    "want to die",
    "not worth living",
    "end my life",
];

const DEPRESSION_PHRASES: &[&str] = &[
    "depressed",
    "depression",
    "hopeless",
    "alone",
    "can't go on",
    "can't keep going",
];

const BULLYING_PHRASES: &[&str] = &["bully", "bullied", "bullying"];

const SUBSTANCE_PHRASES: &[&str] = &["drink", "drugs", "pill", "alcohol", "high"];

const ADULT_PHRASES: &[&str] = &["nude", "sex", "porn"];

/// Fixed probabilities assigned when a phrase list matches.
const SELF_HARM_PROB: f64 = 0.95;
const SELF_HARM_MENTAL_HEALTH_PROB: f64 = 0.9;
const DEPRESSION_PROB: f64 = 0.85;
const BULLYING_PROB: f64 = 0.92;
const SUBSTANCE_PROB: f64 = 0.6;
const ADULT_PROB: f64 = 0.7;

/// Score a text against the phrase lists. Empty text yields all zeros.
///
/// Self-harm matches also raise mental_health_risk, and the depression
/// list max-merges into mental_health_risk rather than overwriting, so a
/// text matching both keeps the higher 0.9.
pub fn keyword_probabilities(text: &str) -> LabelVector {
    let lower = text.to_lowercase();
    let mut out = LabelVector::zeros();

    if matches_any(&lower, SELF_HARM_PHRASES) {
        out.set(Label::SelfHarm, SELF_HARM_PROB);
        out.raise(Label::MentalHealthRisk, SELF_HARM_MENTAL_HEALTH_PROB);
    }
    if matches_any(&lower, DEPRESSION_PHRASES) {
        out.raise(Label::MentalHealthRisk, DEPRESSION_PROB);
    }
    if matches_any(&lower, BULLYING_PHRASES) {
        out.set(Label::Cyberbullying, BULLYING_PROB);
    }
    if matches_any(&lower, SUBSTANCE_PHRASES) {
        out.set(Label::SubstanceAbuse, SUBSTANCE_PROB);
    }
    if matches_any(&lower, ADULT_PHRASES) {
        out.set(Label::AdultContent, ADULT_PROB);
    }

    out
}

fn matches_any(lower: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| lower.contains(p))
}
