// Risk fusion — combines classifier output with keyword heuristics.
//
// The fusion rule is per-label max, never sum: a weak model must not be
// able to suppress an obvious keyword signal, and a strong model can only
// add to it. Fusion is total — a missing or failing classifier degrades
// to the keyword-only path and the request never fails.

use tracing::{debug, warn};

use crate::context::ModelContext;
use crate::labels::LabelVector;

use super::keywords::keyword_probabilities;

/// Why the classifier contributed nothing to a fusion call. Surfaced for
/// logging and tests; callers of `fuse` never see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// No classifier is configured or its artifacts are not loaded.
    ClassifierUnavailable,
    /// The classifier was called and returned an error.
    ClassifierFailed(String),
}

/// Fuse classifier and keyword probabilities for one text.
///
/// Always returns a complete LabelVector with every value in [0,1].
pub async fn fuse(models: &ModelContext, text: &str) -> LabelVector {
    let (labels, degradation) = fuse_detailed(models, text).await;
    match degradation {
        None => {}
        Some(Degradation::ClassifierUnavailable) => {
            debug!("Fusion ran keyword-only (no classifier loaded)");
        }
        Some(Degradation::ClassifierFailed(e)) => {
            warn!(error = %e, "Classifier failed; fusion degraded to keyword-only");
        }
    }
    labels
}

/// Fusion with the degradation signal exposed.
pub async fn fuse_detailed(
    models: &ModelContext,
    text: &str,
) -> (LabelVector, Option<Degradation>) {
    let (model_probs, degradation) = match models.classifier() {
        None => (LabelVector::zeros(), Some(Degradation::ClassifierUnavailable)),
        Some(classifier) => match classifier.classify(text).await {
            Ok(probs) => (probs, None),
            Err(e) => (
                LabelVector::zeros(),
                Some(Degradation::ClassifierFailed(e.to_string())),
            ),
        },
    };

    let keyword_probs = keyword_probabilities(text);
    (model_probs.max(&keyword_probs), degradation)
}

/// Conversation-level aggregation: per-label max across all messages.
pub fn aggregate_max(vectors: &[LabelVector]) -> LabelVector {
    vectors
        .iter()
        .fold(LabelVector::zeros(), |acc, v| acc.max(v))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;

    use crate::classify::traits::TextClassifier;
    use crate::labels::Label;

    use super::*;

    /// Classifier stub returning a fixed vector.
    struct FixedClassifier(LabelVector);

    #[async_trait]
    impl TextClassifier for FixedClassifier {
        async fn classify(&self, _text: &str) -> Result<LabelVector> {
            Ok(self.0)
        }
    }

    /// Classifier stub that always errors.
    struct BrokenClassifier;

    #[async_trait]
    impl TextClassifier for BrokenClassifier {
        async fn classify(&self, _text: &str) -> Result<LabelVector> {
            anyhow::bail!("model exploded")
        }
    }

    fn context_with(classifier: impl TextClassifier + 'static) -> ModelContext {
        ModelContext::new(Some(Arc::new(classifier)), None)
    }

    #[tokio::test]
    async fn test_fusion_takes_per_label_max() {
        let mut model_out = LabelVector::zeros();
        model_out.set(Label::Harassment, 0.8);
        model_out.set(Label::SelfHarm, 0.2);

        let models = context_with(FixedClassifier(model_out));
        // Keyword path: self_harm 0.95, mental_health_risk 0.9
        let (fused, degradation) = fuse_detailed(&models, "I want to kill myself").await;

        assert_eq!(degradation, None);
        assert_eq!(fused.get(Label::Harassment), 0.8); // model only
        assert_eq!(fused.get(Label::SelfHarm), 0.95); // keyword beats model
        assert_eq!(fused.get(Label::MentalHealthRisk), 0.9);
    }

    #[tokio::test]
    async fn test_no_classifier_degrades_to_keywords() {
        let models = ModelContext::empty();
        let (fused, degradation) = fuse_detailed(&models, "they keep bullying me").await;

        assert_eq!(degradation, Some(Degradation::ClassifierUnavailable));
        assert_eq!(fused.get(Label::Cyberbullying), 0.92);
    }

    #[tokio::test]
    async fn test_classifier_failure_never_propagates() {
        let models = context_with(BrokenClassifier);
        let (fused, degradation) = fuse_detailed(&models, "I want to kill myself").await;

        assert!(matches!(degradation, Some(Degradation::ClassifierFailed(_))));
        // Keyword contribution survives intact.
        assert_eq!(fused.get(Label::SelfHarm), 0.95);
    }

    #[tokio::test]
    async fn test_no_signal_at_all_is_all_zero() {
        let models = ModelContext::empty();
        let fused = fuse(&models, "what time is the movie").await;
        assert_eq!(fused, LabelVector::zeros());
    }

    #[test]
    fn test_aggregate_max_over_conversation() {
        let mut a = LabelVector::zeros();
        a.set(Label::SubstanceAbuse, 0.6);
        let mut b = LabelVector::zeros();
        b.set(Label::SubstanceAbuse, 0.3);
        b.set(Label::SelfHarm, 0.95);

        let agg = aggregate_max(&[a, b]);
        assert_eq!(agg.get(Label::SubstanceAbuse), 0.6);
        assert_eq!(agg.get(Label::SelfHarm), 0.95);
    }

    #[test]
    fn test_aggregate_max_empty_is_zero() {
        assert_eq!(aggregate_max(&[]), LabelVector::zeros());
    }
}
