// Privacy scan handler.
//
// POST /api/privacy/check — run the PII pattern scan over a single text.

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::privacy;

#[derive(Deserialize)]
pub struct PrivacyRequest {
    pub text: String,
}

/// POST /api/privacy/check — flag the first PII category found, if any.
pub async fn check(Json(req): Json<PrivacyRequest>) -> impl IntoResponse {
    match privacy::scan(&req.text) {
        Some(hit) => Json(serde_json::json!({
            "flagged": true,
            "type": hit.kind,
            "category": "privacy",
        })),
        None => Json(serde_json::json!({ "flagged": false })),
    }
}
