//! # Health Probes
//!
//! Unauthenticated liveness and readiness endpoints, mounted outside the
//! versioned API surface so orchestrators can probe without credentials.
//! The bootstrap layer holds no connections of its own, so readiness is
//! unconditional once the pipeline is assembled.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

/// Build the health router.
pub fn router() -> Router {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
}

/// GET /health/liveness — the process is up.
async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/readiness — the pipeline is assembled and serving.
async fn readiness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ready" }))
}
