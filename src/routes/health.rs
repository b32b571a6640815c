//! `GET /health`: answers `{"status":"ok"}` while the daemon is serving.
//!
//! Independent of the sensor feed and the log store, so a supervisor can
//! tell a dead process from a dead upstream.

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Stateless, so it merges into the gateway whatever its state type.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
