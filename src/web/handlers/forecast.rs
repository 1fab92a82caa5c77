// Trend forecast handler.
//
// GET /api/forecast?days=3&recent=60 — project future risk scores from
// recent history. A database error or empty history yields an all-zero
// "safe" forecast rather than an error: a dashboard with no data should
// render a flat line, not a failure state.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::forecast::forecast;
use crate::web::AppState;

const DEFAULT_DAYS: usize = 3;
const DEFAULT_RECENT: u32 = 60;

#[derive(Deserialize, Default)]
pub struct ForecastQuery {
    /// Forecast horizon in steps (default 3).
    pub days: Option<usize>,
    /// How many recent records to fit against (default 60).
    pub recent: Option<u32>,
}

/// GET /api/forecast — project future risk from persisted history.
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> impl IntoResponse {
    let days = params.days.unwrap_or(DEFAULT_DAYS);
    let recent = params.recent.unwrap_or(DEFAULT_RECENT);

    let records = match state.db.get_history(recent).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "DB error loading history for forecast");
            Vec::new()
        }
    };

    // Oldest-first score series; empty history forecasts flat zero.
    let series: Vec<f64> = records.iter().map(|r| r.risk_score).collect();
    let points = forecast(&state.models, &series, days);

    // The same predictions as rounded integer percentages, one per day.
    let daily_risk_pct: Vec<i64> = points
        .iter()
        .map(|p| (p.score * 100.0).round() as i64)
        .collect();

    Json(serde_json::json!({
        "forecast": points,
        "daily_risk_pct": daily_risk_pct,
    }))
}
