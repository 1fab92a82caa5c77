// Optional ONNX sequence model for trend forecasting.
//
// The training pipeline exports an LSTM to ONNX along with a preproc.json
// describing the input window and the min/max scaler bounds used during
// training. Input shape [1, seq_len, 1], output [1, horizon].
//
// Every failure here — missing artifacts, bad JSON, shape mismatch,
// runtime error — is surfaced as a Result so the caller can fall back to
// linear extrapolation. Nothing in this module reaches an end user as an
// error.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tracing::debug;

use crate::classify::download::forecast_model_dir;

/// Preprocessing metadata saved next to the exported model.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPreproc {
    /// Input window length the model was trained with.
    pub seq_len: usize,
    /// Number of future steps the model emits per forward pass.
    pub horizon: usize,
    /// Min/max scaler bounds. When present, model outputs are denormalized
    /// as `y * (data_max - data_min) + data_min`.
    pub data_min: Option<f64>,
    pub data_max: Option<f64>,
}

/// Loaded forecast model: ONNX session plus its preprocessing metadata.
pub struct SequenceModel {
    // Session::run takes &mut self; forecasting is a single quick forward
    // pass, so a plain Mutex is enough.
    session: Mutex<Session>,
    preproc: ForecastPreproc,
}

impl SequenceModel {
    /// Load the model from `<model_dir>/forecast/` if the artifacts exist.
    ///
    /// Returns Ok(None) when the artifacts are simply absent (the normal
    /// case on most deployments) and Err only when they exist but are
    /// unusable.
    pub fn load(model_dir: &Path) -> Result<Option<Self>> {
        let dir = forecast_model_dir(model_dir);
        let model_path = dir.join("model.onnx");
        let preproc_path = dir.join("preproc.json");

        if !model_path.exists() || !preproc_path.exists() {
            return Ok(None);
        }

        let preproc_json = std::fs::read_to_string(&preproc_path)
            .with_context(|| format!("Failed to read {}", preproc_path.display()))?;
        let preproc: ForecastPreproc = serde_json::from_str(&preproc_json)
            .with_context(|| format!("Invalid forecast preproc at {}", preproc_path.display()))?;

        if preproc.seq_len == 0 {
            anyhow::bail!("Forecast preproc declares seq_len = 0");
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!("Failed to load forecast model from {}", model_path.display())
            })?;

        debug!(
            seq_len = preproc.seq_len,
            horizon = preproc.horizon,
            "Loaded forecast sequence model"
        );

        Ok(Some(Self {
            session: Mutex::new(session),
            preproc,
        }))
    }

    /// Predict `horizon` future scores from the series.
    ///
    /// The input window is the most recent seq_len values, left-zero-padded
    /// when the series is shorter. Outputs are denormalized via the stored
    /// scaler bounds (when present) and clipped to [0,1]. A model that
    /// emits fewer than `horizon` values is treated as a failure.
    pub fn predict(&self, series: &[f64], horizon: usize) -> Result<Vec<f64>> {
        let window = build_window(series, self.preproc.seq_len);
        let input: Vec<f32> = window.iter().map(|&v| v as f32).collect();

        let shape = [1_i64, self.preproc.seq_len as i64, 1_i64];
        let tensor =
            Tensor::from_array((shape, input)).context("Failed to create forecast input tensor")?;

        let raw: Vec<f64> = {
            let mut session = self
                .session
                .lock()
                .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

            let outputs = session
                .run(ort::inputs! { "input" => tensor })
                .context("Forecast model inference failed")?;

            let (_out_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .context("Failed to extract forecast output tensor")?;

            data.iter().map(|&v| v as f64).collect()
        };

        if raw.len() < horizon {
            anyhow::bail!(
                "Forecast model emitted {} values, need {horizon}",
                raw.len()
            );
        }

        Ok(raw
            .into_iter()
            .take(horizon)
            .map(|v| self.denormalize(v).clamp(0.0, 1.0))
            .collect())
    }

    fn denormalize(&self, value: f64) -> f64 {
        match (self.preproc.data_min, self.preproc.data_max) {
            (Some(min), Some(max)) => value * (max - min) + min,
            _ => value,
        }
    }
}

/// The most recent `seq_len` values, left-zero-padded to exactly seq_len.
fn build_window(series: &[f64], seq_len: usize) -> Vec<f64> {
    let tail_len = series.len().min(seq_len);
    let tail = &series[series.len() - tail_len..];

    let mut window = vec![0.0; seq_len - tail_len];
    window.extend_from_slice(tail);
    window
}
