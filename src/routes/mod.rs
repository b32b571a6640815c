use axum::Router;
use chrono::FixedOffset;
use tokio::sync::watch;

use crate::log_api::LogApiClient;
use crate::monitor::MonitorState;

mod dashboard;
mod health;
mod logs;

// ---

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub monitor: watch::Receiver<MonitorState>,
    pub log_api: LogApiClient,
    pub offset: FixedOffset,
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(dashboard::router())
        .merge(logs::router())
        .merge(health::router())
        .with_state(state)
}
