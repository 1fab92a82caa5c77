// Local ONNX multi-label risk classifier.
//
// Runs entirely on the local CPU — no API calls, no rate limits, no
// network dependency. The model is a distilbert-based multi-label head
// with one sigmoid output per taxonomy label, in `Label::ALL` order.
//
// Expects `model_quantized.onnx` and `tokenizer.json` in the model dir;
// run `palisade download-model` to fetch them.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use crate::labels::{Label, LabelVector};

use super::traits::TextClassifier;

/// ONNX-based classifier. Holds the model session and tokenizer behind
/// Arc<Mutex> so inference can be offloaded to spawn_blocking without
/// blocking the async runtime.
pub struct OnnxClassifier {
    // Arc+Mutex because:
    // 1. ort::Session::run takes &mut self, so we need interior mutability
    // 2. spawn_blocking requires 'static, so we need Arc for shared ownership
    // 3. We need Send+Sync for the TextClassifier trait
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxClassifier {
    /// Load the ONNX model and tokenizer from the given directory.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model_quantized.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `palisade download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}\nRun `palisade download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        debug!("Loaded ONNX classifier from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl TextClassifier for OnnxClassifier {
    async fn classify(&self, text: &str) -> Result<LabelVector> {
        let mut results = self.classify_batch(&[text.to_string()]).await?;
        Ok(results.remove(0))
    }

    /// True batch inference: tokenize all texts, run one forward pass,
    /// apply sigmoid to the logits, and map outputs to label vectors.
    ///
    /// The CPU-bound tokenization and inference are offloaded to
    /// spawn_blocking so they don't block the tokio async runtime.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<LabelVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Clone Arc handles for the spawn_blocking closure ('static requirement)
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let encodings: Vec<_> = texts
                .iter()
                .map(|t| {
                    tokenizer
                        .encode(t.as_str(), true)
                        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
                })
                .collect::<Result<Vec<_>>>()?;

            let batch_size = encodings.len();
            let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);

            // Flat input tensors with right-padding to max_len.
            // Shape: [batch_size, max_len]
            let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
            let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

            for enc in &encodings {
                let ids = enc.get_ids();
                let mask = enc.get_attention_mask();
                let seq_len = ids.len();

                for &id in ids {
                    input_ids_flat.push(id as i64);
                }
                for &m in mask {
                    attention_mask_flat.push(m as i64);
                }

                // Pad to max_len (pad_id = 0 for BERT-family tokenizers)
                for _ in seq_len..max_len {
                    input_ids_flat.push(0);
                    attention_mask_flat.push(0);
                }
            }

            let shape = [batch_size as i64, max_len as i64];

            let input_ids_tensor = Tensor::from_array((shape, input_ids_flat))
                .context("Failed to create input_ids tensor")?;
            let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat))
                .context("Failed to create attention_mask tensor")?;

            let logits_data = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids_tensor,
                        "attention_mask" => attention_mask_tensor
                    })
                    .context("ONNX inference failed")?;

                // Output shape: [batch_size, 7] — raw logits (pre-sigmoid)
                let (_out_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;

                data.to_vec()
            };

            if logits_data.len() < batch_size * Label::COUNT {
                anyhow::bail!(
                    "Classifier output too short: expected {} logits, got {}",
                    batch_size * Label::COUNT,
                    logits_data.len()
                );
            }

            let mut results = Vec::with_capacity(batch_size);
            for (i, text) in texts.iter().enumerate() {
                let offset = i * Label::COUNT;
                let row = &logits_data[offset..offset + Label::COUNT];

                let scores: Vec<f64> = row.iter().map(|&logit| sigmoid(logit as f64)).collect();
                let labels = LabelVector::from_scores(&scores);

                debug!(
                    self_harm = labels.get(Label::SelfHarm),
                    mental_health_risk = labels.get(Label::MentalHealthRisk),
                    text_preview = %crate::output::truncate_chars(text, 50),
                    "Classified text"
                );

                results.push(labels);
            }

            Ok(results)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Sigmoid activation: maps any real number to (0, 1).
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_zero() {
        let result = sigmoid(0.0);
        assert!((result - 0.5).abs() < 1e-10, "sigmoid(0) should be 0.5");
    }

    #[test]
    fn test_sigmoid_saturates() {
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn test_sigmoid_symmetry() {
        // sigmoid(x) + sigmoid(-x) = 1.0
        for x in [0.5, 1.0, 2.0, 5.0] {
            let sum = sigmoid(x) + sigmoid(-x);
            assert!(
                (sum - 1.0).abs() < 1e-10,
                "sigmoid({x}) + sigmoid(-{x}) should equal 1.0"
            );
        }
    }

    #[test]
    fn test_load_fails_without_files() {
        let dir = std::env::temp_dir().join("palisade-onnx-missing");
        let result = OnnxClassifier::load(&dir);
        assert!(result.is_err());
    }
}
