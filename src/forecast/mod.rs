// Trend forecasting — projects future risk scores from persisted history.
//
// Two paths: the pre-trained sequence model (when its artifacts are
// loaded) and OLS linear extrapolation. The model path falls back to
// linear unconditionally on any failure; forecasting itself never fails.

pub mod linear;
pub mod model;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::ModelContext;
use crate::scoring::RiskLevel;

pub use linear::linear_extrapolate;
pub use model::SequenceModel;

/// One forecast step. Ephemeral — computed on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 1-based step offset into the future.
    pub step: usize,
    pub score: f64,
    pub risk_level: RiskLevel,
}

/// Which path produced a forecast. Surfaced for logging and tests only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastSource {
    Model,
    /// Linear path because no model is loaded.
    Linear,
    /// Linear path because the model was tried and failed.
    LinearFallback(String),
}

/// Forecast `horizon` future scores from an oldest-first series.
pub fn forecast(models: &ModelContext, series: &[f64], horizon: usize) -> Vec<ForecastPoint> {
    let (points, source) = forecast_detailed(models, series, horizon);
    match source {
        ForecastSource::Model => debug!(horizon, "Forecast produced by sequence model"),
        ForecastSource::Linear => debug!(horizon, "Forecast produced by linear extrapolation"),
        ForecastSource::LinearFallback(e) => {
            warn!(error = %e, "Forecast model failed; fell back to linear extrapolation");
        }
    }
    points
}

/// Forecasting with the path decision exposed.
pub fn forecast_detailed(
    models: &ModelContext,
    series: &[f64],
    horizon: usize,
) -> (Vec<ForecastPoint>, ForecastSource) {
    let (scores, source) = match models.forecaster() {
        Some(model) => match model.predict(series, horizon) {
            Ok(scores) => (scores, ForecastSource::Model),
            Err(e) => (
                linear_extrapolate(series, horizon),
                ForecastSource::LinearFallback(e.to_string()),
            ),
        },
        None => (linear_extrapolate(series, horizon), ForecastSource::Linear),
    };

    (to_points(&scores), source)
}

fn to_points(scores: &[f64]) -> Vec<ForecastPoint> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| ForecastPoint {
            step: i + 1,
            score,
            risk_level: RiskLevel::from_score(score),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_model_uses_linear_path() {
        let models = ModelContext::empty();
        let (points, source) = forecast_detailed(&models, &[0.1, 0.2, 0.3], 3);

        assert_eq!(source, ForecastSource::Linear);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].step, 1);
        assert!((points[0].score - 0.4).abs() < 1e-10);
        assert_eq!(points[0].risk_level, RiskLevel::Medium);
        assert_eq!(points[1].risk_level, RiskLevel::High);
        assert_eq!(points[2].risk_level, RiskLevel::High);
    }

    #[test]
    fn test_empty_series_is_all_safe() {
        let models = ModelContext::empty();
        let points = forecast(&models, &[], 3);
        assert_eq!(points.len(), 3);
        for p in &points {
            assert_eq!(p.score, 0.0);
            assert_eq!(p.risk_level, RiskLevel::Safe);
        }
    }

    #[test]
    fn test_output_length_always_matches_horizon() {
        let models = ModelContext::empty();
        for horizon in [0, 1, 3, 14] {
            assert_eq!(forecast(&models, &[0.2, 0.4], horizon).len(), horizon);
            assert_eq!(forecast(&models, &[0.9], horizon).len(), horizon);
            assert_eq!(forecast(&models, &[], horizon).len(), horizon);
        }
    }

    #[test]
    fn test_scores_always_in_unit_interval() {
        let models = ModelContext::empty();
        for p in forecast(&models, &[0.1, 0.95], 10) {
            assert!((0.0..=1.0).contains(&p.score));
        }
    }

    #[test]
    fn test_steps_are_one_based_and_ordered() {
        let models = ModelContext::empty();
        let points = forecast(&models, &[0.3, 0.3, 0.3], 5);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.step, i + 1);
        }
    }
}
