// Unit tests for the forecasting surface.
//
// Exercises the public forecast API with no model loaded: the linear
// path, its degenerate-series behavior, and the level mapping applied to
// each projected step.

use palisade::context::ModelContext;
use palisade::forecast::{forecast, forecast_detailed, linear_extrapolate, ForecastSource};
use palisade::scoring::RiskLevel;

// ============================================================
// linear_extrapolate — the fallback everyone ends up on
// ============================================================

#[test]
fn rising_series_keeps_rising() {
    let out = linear_extrapolate(&[0.1, 0.2, 0.3], 3);
    assert_eq!(out.len(), 3);
    assert!((out[0] - 0.4).abs() < 1e-10);
    assert!((out[1] - 0.5).abs() < 1e-10);
    assert!((out[2] - 0.6).abs() < 1e-10);
}

#[test]
fn falling_series_clamps_at_zero() {
    let out = linear_extrapolate(&[0.3, 0.2, 0.1], 5);
    assert!(out.iter().all(|&v| v >= 0.0));
    assert_eq!(*out.last().unwrap(), 0.0);
}

#[test]
fn steep_rise_clamps_at_one() {
    let out = linear_extrapolate(&[0.2, 0.9], 4);
    assert!(out.iter().all(|&v| v <= 1.0));
    assert_eq!(*out.last().unwrap(), 1.0);
}

#[test]
fn single_point_repeats_last_value() {
    assert_eq!(linear_extrapolate(&[0.42], 3), vec![0.42, 0.42, 0.42]);
}

#[test]
fn empty_series_is_flat_zero() {
    assert_eq!(linear_extrapolate(&[], 3), vec![0.0, 0.0, 0.0]);
}

#[test]
fn flat_series_stays_flat() {
    let out = linear_extrapolate(&[0.5, 0.5, 0.5, 0.5], 3);
    for v in out {
        assert!((v - 0.5).abs() < 1e-9);
    }
}

// ============================================================
// forecast — total function over the model context
// ============================================================

#[test]
fn no_model_reports_linear_source() {
    let models = ModelContext::empty();
    let (_, source) = forecast_detailed(&models, &[0.2, 0.3], 3);
    assert_eq!(source, ForecastSource::Linear);
}

#[test]
fn points_carry_level_mapping() {
    let models = ModelContext::empty();
    let points = forecast(&models, &[0.1, 0.2, 0.3], 3);
    // 0.4 → Medium, 0.5 → High, 0.6 → High
    assert_eq!(points[0].risk_level, RiskLevel::Medium);
    assert_eq!(points[1].risk_level, RiskLevel::High);
    assert_eq!(points[2].risk_level, RiskLevel::High);
}

#[test]
fn horizon_zero_is_empty_not_error() {
    let models = ModelContext::empty();
    assert!(forecast(&models, &[0.5, 0.6], 0).is_empty());
}

#[test]
fn length_always_equals_horizon() {
    let models = ModelContext::empty();
    for horizon in [1, 3, 7, 30] {
        for series in [&[][..], &[0.5][..], &[0.1, 0.9][..]] {
            assert_eq!(forecast(&models, series, horizon).len(), horizon);
        }
    }
}
