// Text classifier trait — the swap-ready abstraction.
//
// The default implementation is a local ONNX multi-label model. Anything
// that can produce a probability per taxonomy label for a piece of text
// fits behind this trait (a remote API, a different local model, a stub
// in tests).

use anyhow::Result;
use async_trait::async_trait;

use crate::labels::LabelVector;

/// Trait for multi-label risk classification. Implementations are async
/// because providers may need HTTP calls or blocking-pool inference.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Classify a single text, returning a probability per label.
    async fn classify(&self, text: &str) -> Result<LabelVector>;

    /// Classify multiple texts, returning results in the same order.
    /// Default implementation calls classify sequentially — providers
    /// can override for batching if they support it.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<LabelVector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await?);
        }
        Ok(results)
    }
}
