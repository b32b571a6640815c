//! Fire-and-forget side effects.
//!
//! Notifications and snapshot submissions run on their own tasks so a slow
//! endpoint never holds up the next sensor update. Nothing awaits them;
//! failures go to a [`FailureReporter`] instead of being returned.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::alerts::{AlertKey, Notification};
use crate::error::ClientError;
use crate::log_api::SnapshotSink;
use crate::models::SnapshotPayload;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Notification(AlertKey),
    Snapshot,
}

#[derive(Debug)]
pub struct EffectFailure {
    pub kind: EffectKind,
    pub error: ClientError,
}

pub type FailureReporter = Arc<dyn Fn(EffectFailure) + Send + Sync>;

/// Reporter that only logs.
pub fn log_failures() -> FailureReporter {
    Arc::new(|failure: EffectFailure| match failure.kind {
        EffectKind::Notification(key) => {
            tracing::warn!(key = %key, "Notification not delivered: {}", failure.error);
        }
        EffectKind::Snapshot => {
            tracing::error!("Failed to save daily log: {}", failure.error);
        }
    })
}

pub fn spawn_notification(
    notifier: Arc<dyn Notifier>,
    notification: Notification,
    report: FailureReporter,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(error) = notifier.send(&notification).await {
            report(EffectFailure {
                kind: EffectKind::Notification(notification.key),
                error,
            });
        }
    })
}

pub fn spawn_snapshot(
    sink: Arc<dyn SnapshotSink>,
    payload: SnapshotPayload,
    report: FailureReporter,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(error) = sink.submit(&payload).await {
            report(EffectFailure {
                kind: EffectKind::Snapshot,
                error,
            });
        }
    })
}
