//! Monitoring daemon for a biogas digester.
//!
//! Follows the live sensor values in a Firebase Realtime Database, raises
//! one notification per threshold excursion, posts a once-a-day snapshot
//! to a remote log store, and serves the dashboard and log history as JSON.
//!
//! Module boundaries follow the Explicit Module Boundary Pattern (EMBP):
//! `main.rs` only talks to `config`, `feed`, `monitor` and `routes`; the
//! rest is reached through those.

pub mod alerts;
pub mod config;
pub mod effects;
pub mod error;
pub mod feed;
pub mod log_api;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod routes;
pub mod scheduler;
pub mod status;
pub mod views;

pub use config::Config;
pub use error::ClientError;
pub use models::{FieldUpdate, LogEntry, Reading, SensorField, SnapshotPayload};
