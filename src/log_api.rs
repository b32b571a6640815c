//! Client for the remote log store.
//!
//! Two endpoints, both relative to `LOG_API_URL`:
//! - `POST /api/saveLogs`: store one daily snapshot
//! - `GET  /api/showLogs`: list every stored snapshot, server order
//!
//! Neither call is retried. A failed save means that day has no snapshot.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ensure_success, ClientError};
use crate::models::{LogEntry, SnapshotPayload};

// ---

/// Destination for daily snapshots.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn submit(&self, payload: &SnapshotPayload) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct LogApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl LogApiClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        LogApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch every stored snapshot.
    ///
    /// Items that are not JSON objects are skipped with a debug log rather
    /// than failing the whole list.
    pub async fn show_logs(&self) -> Result<Vec<LogEntry>, ClientError> {
        // ---
        let url = self.endpoint("/api/showLogs");
        tracing::debug!("Fetching logs from: {}", url);

        let resp = ensure_success(self.client.get(&url).send().await?)?;
        let body: Value = resp.json().await?;

        let items = match body {
            Value::Array(items) => items,
            other => {
                return Err(ClientError::Decode(format!(
                    "expected a JSON array from {}, got {}",
                    url,
                    json_kind(&other)
                )))
            }
        };

        let mut entries = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<LogEntry>(item) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::debug!("Failed to parse log item {}: {}", i, e);
                }
            }
        }

        tracing::info!("Fetched {} log entries", entries.len());
        Ok(entries)
    }

    /// Store one snapshot.
    pub async fn save_log(&self, payload: &SnapshotPayload) -> Result<(), ClientError> {
        // ---
        let url = self.endpoint("/api/saveLogs");
        let resp = self.client.post(&url).json(payload).send().await?;
        ensure_success(resp)?;

        tracing::info!("Daily log saved at {}", payload.created_at);
        Ok(())
    }
}

#[async_trait]
impl SnapshotSink for LogApiClient {
    async fn submit(&self, payload: &SnapshotPayload) -> Result<(), ClientError> {
        self.save_log(payload).await
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = LogApiClient::new(reqwest::Client::new(), "http://logs.local/");
        assert_eq!(api.endpoint("/api/showLogs"), "http://logs.local/api/showLogs");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transient() {
        // ---
        // Grab a free port, then close it so nothing is listening there.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = LogApiClient::new(reqwest::Client::new(), &format!("http://{addr}"));
        let err = tokio_test::assert_err!(api.show_logs().await);
        assert!(err.is_transient(), "unexpected error kind: {err}");
    }
}
