//! Notification delivery.
//!
//! Delivery is best effort. The monitor hands every [`Notification`] to a
//! [`Notifier`] on a spawned task and never looks at the outcome beyond
//! logging it; alert state has already moved on by then.

use async_trait::async_trait;
use serde::Serialize;

use crate::alerts::Notification;
use crate::error::{ensure_success, ClientError};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), ClientError>;
}

/// Writes notifications to the log. Used when no webhook is configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), ClientError> {
        tracing::warn!(
            key = %notification.key,
            title = %notification.title,
            "{}",
            notification.body
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    key: &'a str,
    title: &'a str,
    body: &'a str,
    priority: &'static str,
    sound: &'static str,
}

/// Pushes notifications to an HTTP endpoint as JSON.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        WebhookNotifier {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), ClientError> {
        // ---
        let body = WebhookBody {
            key: notification.key.as_str(),
            title: &notification.title,
            body: &notification.body,
            priority: "max",
            sound: "default",
        };

        let resp = self.client.post(&self.url).json(&body).send().await?;
        ensure_success(resp)?;

        tracing::debug!(key = %notification.key, url = %self.url, "notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::alerts::AlertKey;

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let notification = Notification::for_key(AlertKey::TankLow);
        tokio_test::assert_ok!(LogNotifier.send(&notification).await);
    }

    #[test]
    fn test_webhook_body_shape() {
        // ---
        let n = Notification::for_key(AlertKey::Gas2Critical);
        let body = WebhookBody {
            key: n.key.as_str(),
            title: &n.title,
            body: &n.body,
            priority: "max",
            sound: "default",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "key": "gas2_critical",
                "title": "🚨 Gas Leak Detected",
                "body": "Gas Leak Sensor 2 is CRITICAL",
                "priority": "max",
                "sound": "default",
            })
        );
    }
}
