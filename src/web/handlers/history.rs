// Risk history handlers.
//
// GET    /api/history?limit= — recent records, newest first
// DELETE /api/history        — bulk clear

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::web::{api_error, AppState};

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 500;

#[derive(Deserialize, Default)]
pub struct HistoryQuery {
    /// Max records to return (default 50, cap 500).
    pub limit: Option<u32>,
}

/// GET /api/history — recent records, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    match state.db.get_recent(limit).await {
        Ok(records) => {
            let count = records.len();
            Json(serde_json::json!({
                "records": records,
                "count": count,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "DB error listing history");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

/// DELETE /api/history — remove every record.
pub async fn clear_history(State(state): State<AppState>) -> Response {
    match state.db.delete_all().await {
        Ok(deleted) => Json(serde_json::json!({ "deleted": deleted })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "DB error clearing history");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}
