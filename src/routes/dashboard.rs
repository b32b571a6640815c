//! `GET /dashboard`: live readings with their bands and alert states.

use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use super::AppState;
use crate::views::{self, DashboardView};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(handler))
}

async fn handler(State(state): State<AppState>) -> Json<DashboardView> {
    // ---
    let snapshot = state.monitor.borrow().clone();
    debug!(primed = snapshot.primed, "GET /dashboard");
    Json(views::dashboard(&snapshot))
}
