// Aggregate statistics handler.
//
// GET /api/stats — summary over the full persisted history. The heavy
// lifting lives in crate::stats so the CLI shares the same computation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::stats;
use crate::web::{api_error, AppState};

/// GET /api/stats — distribution, timeline, and averages over history.
pub async fn get_stats(State(state): State<AppState>) -> Response {
    let records = match state.db.get_history(u32::MAX).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "DB error loading history for stats");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
        }
    };

    Json(stats::compute(&records)).into_response()
}
