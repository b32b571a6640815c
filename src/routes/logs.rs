//! `GET /logs`: stored daily snapshots with derived bands.
//!
//! A failed fetch is logged and served as an empty list; the log screen
//! never shows an error page.

use axum::{extract::State, routing::get, Json, Router};
use tracing::{error, info};

use super::AppState;
use crate::views::{self, LogListView};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/logs", get(handler))
}

async fn handler(State(state): State<AppState>) -> Json<LogListView> {
    // ---
    info!("GET /logs - fetching from log store");

    let entries = match state.log_api.show_logs().await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to fetch logs: {}", e);
            Vec::new()
        }
    };

    Json(views::log_list(&entries, &state.offset))
}
