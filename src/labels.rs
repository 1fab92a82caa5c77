// The fixed risk taxonomy and the per-label probability vector.
//
// Every part of the pipeline speaks in terms of these 7 categories. The
// order here matches the output order of the ONNX classifier, so the
// classifier can map logits to labels by index.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The 7 risk categories, in classifier output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    MentalHealthRisk,
    SubstanceAbuse,
    Harassment,
    Cyberbullying,
    SelfHarm,
    AdultContent,
    OnlinePredator,
}

impl Label {
    pub const COUNT: usize = 7;

    /// All labels, in classifier output order.
    pub const ALL: [Label; Label::COUNT] = [
        Label::MentalHealthRisk,
        Label::SubstanceAbuse,
        Label::Harassment,
        Label::Cyberbullying,
        Label::SelfHarm,
        Label::AdultContent,
        Label::OnlinePredator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::MentalHealthRisk => "mental_health_risk",
            Label::SubstanceAbuse => "substance_abuse",
            Label::Harassment => "harassment",
            Label::Cyberbullying => "cyberbullying",
            Label::SelfHarm => "self_harm",
            Label::AdultContent => "adult_content",
            Label::OnlinePredator => "online_predator",
        }
    }

    /// Parse a label name. Unknown names return None — callers decide
    /// whether to skip or default them.
    pub fn from_str(name: &str) -> Option<Label> {
        Label::ALL.iter().copied().find(|l| l.as_str() == name)
    }

    /// Position in the classifier output vector.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A probability per label, always complete: every label is present and
/// defaults to 0.0. Values are clamped to [0,1] on set.
///
/// Serializes as a JSON object keyed by label name (the wire and DB format).
/// Deserialization tolerates missing labels (→ 0.0) and skips unknown keys.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelVector {
    probs: [f64; Label::COUNT],
}

impl LabelVector {
    /// All-zero vector — the contribution of an absent or failed classifier.
    pub fn zeros() -> Self {
        Self::default()
    }

    pub fn get(&self, label: Label) -> f64 {
        self.probs[label.index()]
    }

    /// Set a label's probability, clamped to [0,1].
    pub fn set(&mut self, label: Label, prob: f64) {
        self.probs[label.index()] = prob.clamp(0.0, 1.0);
    }

    /// Raise a label's probability to at least `prob` (clamped). Existing
    /// higher values are kept — this is the max-merge used everywhere.
    pub fn raise(&mut self, label: Label, prob: f64) {
        let p = prob.clamp(0.0, 1.0);
        if p > self.probs[label.index()] {
            self.probs[label.index()] = p;
        }
    }

    /// Per-label maximum of two vectors.
    pub fn max(&self, other: &LabelVector) -> LabelVector {
        let mut out = *self;
        for label in Label::ALL {
            out.raise(label, other.get(label));
        }
        out
    }

    /// Iterate (label, probability) pairs in taxonomy order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, f64)> + '_ {
        Label::ALL.iter().map(move |&l| (l, self.get(l)))
    }

    /// Build from a slice of classifier outputs in taxonomy order.
    /// Shorter slices leave the remaining labels at 0.0.
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut out = Self::default();
        for (label, &score) in Label::ALL.iter().zip(scores.iter()) {
            out.set(*label, score);
        }
        out
    }
}

impl Serialize for LabelVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Label::COUNT))?;
        for (label, prob) in self.iter() {
            map.serialize_entry(label.as_str(), &prob)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabelVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VecVisitor;

        impl<'de> Visitor<'de> for VecVisitor {
            type Value = LabelVector;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of label name to probability")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = LabelVector::default();
                while let Some((key, value)) = access.next_entry::<String, f64>()? {
                    if let Some(label) = Label::from_str(&key) {
                        out.set(label, value);
                    }
                    // Unknown labels are ignored — the taxonomy is closed.
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(VecVisitor)
    }
}
