//! Sensor feed over the Firebase Realtime Database REST API.
//!
//! Each of the five values under `sensors/` gets its own subscription: a
//! task polling `GET {db}/sensors/{key}.json` that pushes a
//! [`FieldUpdate`] into the monitor's channel whenever the value changes.
//! Null or non-numeric values arrive as 0 (see
//! [`coerce_sensor_value`]). A failed poll keeps the previous value.
//!
//! Dropping a [`Subscription`] stops its task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{ensure_success, ClientError};
use crate::models::{coerce_sensor_value, FieldUpdate, SensorField};

// ---

#[derive(Debug, Clone)]
pub struct FirebaseFeed {
    client: reqwest::Client,
    base_url: String,
    auth: Option<String>,
    poll_interval: Duration,
}

impl FirebaseFeed {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        auth: Option<String>,
        poll_interval: Duration,
    ) -> Self {
        FirebaseFeed {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            poll_interval,
        }
    }

    fn value_url(&self, field: SensorField) -> String {
        format!("{}/sensors/{}.json", self.base_url, field.key())
    }

    /// Read the current value of one sensor.
    pub async fn fetch(&self, field: SensorField) -> Result<f64, ClientError> {
        // ---
        let mut req = self.client.get(self.value_url(field));
        if let Some(auth) = &self.auth {
            req = req.query(&[("auth", auth.as_str())]);
        }

        let resp = ensure_success(req.send().await?)?;
        let raw: serde_json::Value = resp.json().await?;
        Ok(coerce_sensor_value(&raw))
    }

    /// Start polling one sensor. Updates go to `tx` until the subscription
    /// is dropped or the receiver goes away.
    pub fn subscribe(&self, field: SensorField, tx: mpsc::Sender<FieldUpdate>) -> Subscription {
        // ---
        let feed = self.clone();
        let handle = tokio::spawn(async move { feed.poll_loop(field, tx).await });
        Subscription { field, handle }
    }

    /// One subscription per sensor.
    pub fn subscribe_all(&self, tx: mpsc::Sender<FieldUpdate>) -> Vec<Subscription> {
        SensorField::ALL
            .into_iter()
            .map(|field| self.subscribe(field, tx.clone()))
            .collect()
    }

    async fn poll_loop(self, field: SensorField, tx: mpsc::Sender<FieldUpdate>) {
        // ---
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last: Option<f64> = None;
        let mut failing = false;

        tracing::debug!(field = %field, "sensor subscription started");

        loop {
            ticker.tick().await;

            match self.fetch(field).await {
                Ok(value) => {
                    if failing {
                        tracing::info!(field = %field, "sensor feed recovered");
                        failing = false;
                    }
                    if last == Some(value) {
                        continue;
                    }
                    last = Some(value);
                    if tx.send(FieldUpdate { field, value }).await.is_err() {
                        tracing::debug!(field = %field, "monitor gone, ending subscription");
                        break;
                    }
                }
                Err(e) if !failing => {
                    if e.is_transient() {
                        tracing::warn!(field = %field, "sensor poll failed: {}", e);
                    } else {
                        tracing::error!(field = %field, "sensor poll rejected: {}", e);
                    }
                    failing = true;
                }
                Err(e) => {
                    tracing::debug!(field = %field, "sensor poll still failing: {}", e);
                }
            }
        }
    }
}

/// Live subscription to one sensor value. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    field: SensorField,
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn field(&self) -> SensorField {
        self.field
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
