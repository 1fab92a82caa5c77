// Web server — Axum-based JSON API for the scoring backend.
//
// All routes live under /api/* and serve JSON; there is no embedded
// frontend — dashboards talk to this API cross-origin, so CORS origins
// come from configuration.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::context::ModelContext;
use crate::db::Database;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub config: Arc<Config>,
    pub models: Arc<ModelContext>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    config: Config,
    db: Arc<dyn Database>,
    models: Arc<ModelContext>,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState {
        db,
        config: Arc::new(config),
        models,
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Palisade API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config.allowed_origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/predict", post(handlers::predict::predict))
        .route("/api/forecast", get(handlers::forecast::get_forecast))
        .route("/api/privacy/check", post(handlers::privacy::check))
        .route("/api/stats", get(handlers::stats::get_stats))
        .route("/api/history", get(handlers::history::list_history))
        .route("/api/history", delete(handlers::history::clear_history))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parse the comma-separated origin list from config. "*" means any.
fn allowed_origins(raw: &str) -> AllowOrigin {
    if raw.trim() == "*" {
        return AllowOrigin::any();
    }
    let origins: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    AllowOrigin::list(origins)
}

/// Deployment health check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
