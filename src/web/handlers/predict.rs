// Conversation scoring handler.
//
// POST /api/predict — fuse each message, aggregate per-label max across
// the conversation, reduce to a risk score, persist the result keyed to
// the last message. The response and the stored record both use the
// coarser three-level mapping; the four-level scale belongs to forecasts.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::classify::{aggregate_max, fuse};
use crate::db::models::NewRecord;
use crate::scoring::{score, StoredLevel};
use crate::web::{api_error, AppState};

#[derive(Deserialize)]
pub struct PredictRequest {
    pub messages: Vec<IncomingMessage>,
}

#[derive(Deserialize)]
pub struct IncomingMessage {
    pub text: String,
    pub sender: Option<String>,
}

/// POST /api/predict — score a conversation.
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Response {
    if req.messages.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "messages must not be empty");
    }

    let mut per_message = Vec::with_capacity(req.messages.len());
    let mut vectors = Vec::with_capacity(req.messages.len());
    for msg in &req.messages {
        let labels = fuse(&state.models, &msg.text).await;
        per_message.push(serde_json::json!({
            "text": msg.text,
            "sender": msg.sender,
            "labels": labels,
        }));
        vectors.push(labels);
    }

    let aggregated = aggregate_max(&vectors);
    let assessment = score(&aggregated);
    let level = StoredLevel::from_score(assessment.risk_score);

    // Persist against the conversation's final message.
    let last = req.messages.last().map(|m| (m.text.clone(), m.sender.clone()));
    let (message, sender) = last.unwrap_or((String::new(), None));
    let record = NewRecord::from_assessment(
        Some(message),
        sender,
        assessment.risk_score,
        aggregated,
    );

    // A failed write loses the history row, not the assessment: log it and
    // answer with a null id so the caller still gets the scores.
    let id = match state.db.insert_record(&record).await {
        Ok(id) => serde_json::Value::from(id),
        Err(e) => {
            tracing::error!(error = %e, "DB error persisting prediction");
            serde_json::Value::Null
        }
    };

    Json(serde_json::json!({
        "id": id,
        "summary": {
            "agg_label_scores": aggregated,
            "risk": {
                "level": level.as_str(),
                "score": assessment.risk_score,
            },
        },
        "per_message": per_message,
    }))
    .into_response()
}
