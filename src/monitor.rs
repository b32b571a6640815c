//! The monitoring session.
//!
//! One task owns the latest [`Reading`], the [`AlertDebouncer`] and the
//! [`DailySnapshotScheduler`]. It is driven by two sources in a single
//! `select!` loop: sensor updates from the feed subscriptions, and the
//! snapshot check tick. Nothing else touches that state, so there are no
//! locks; readers get a copy through a `watch` channel.
//!
//! Every update is evaluated against the whole reading. A sensor that has
//! not reported yet counts as 0, so the first few updates after startup can
//! raise tank/flow/pH alerts that clear as soon as the real values arrive.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::alerts::{AlertDebouncer, AlertKey, AlertState, Notification};
use crate::effects::{self, FailureReporter};
use crate::feed::Subscription;
use crate::log_api::SnapshotSink;
use crate::models::{FieldSet, FieldUpdate, Reading, SnapshotPayload};
use crate::notify::Notifier;
use crate::scheduler::DailySnapshotScheduler;

// ---

/// What the dashboard sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorState {
    pub reading: Reading,
    /// Every sensor has reported at least once. Informational only.
    pub primed: bool,
    pub alerts: BTreeMap<AlertKey, AlertState>,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub last_snapshot: Option<NaiveDate>,
}

impl Default for MonitorState {
    fn default() -> Self {
        MonitorState {
            reading: Reading::default(),
            primed: false,
            alerts: AlertDebouncer::new().states().collect(),
            updated_at: None,
            last_snapshot: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    /// Offset of the installation's wall clock from UTC.
    pub offset: FixedOffset,
    /// How often to check whether the daily snapshot is due.
    pub check_interval: Duration,
    pub clock: fn() -> DateTime<Utc>,
}

impl MonitorSettings {
    pub fn new(offset: FixedOffset, check_interval: Duration) -> Self {
        MonitorSettings {
            offset,
            check_interval,
            clock: Utc::now,
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        (self.clock)().with_timezone(&self.offset)
    }
}

/// External capabilities the session schedules work on.
#[derive(Clone)]
pub struct Effects {
    pub notifier: Arc<dyn Notifier>,
    pub sink: Arc<dyn SnapshotSink>,
    pub report: FailureReporter,
}

pub struct Monitor {
    reading: Reading,
    seen: FieldSet,
    debouncer: AlertDebouncer,
    scheduler: DailySnapshotScheduler,
    state_tx: watch::Sender<MonitorState>,
}

impl Monitor {
    pub fn new() -> (Self, watch::Receiver<MonitorState>) {
        let (state_tx, state_rx) = watch::channel(MonitorState::default());
        let monitor = Monitor {
            reading: Reading::default(),
            seen: FieldSet::default(),
            debouncer: AlertDebouncer::new(),
            scheduler: DailySnapshotScheduler::new(),
            state_tx,
        };
        (monitor, state_rx)
    }

    /// Apply one sensor update and return the notifications it raised.
    pub fn apply(&mut self, update: FieldUpdate, now: DateTime<FixedOffset>) -> Vec<Notification> {
        // ---
        self.reading.set(update.field, update.value);
        self.seen.insert(update.field);

        if !self.seen.is_complete() {
            tracing::debug!(field = %update.field, "evaluating with unreported sensors at 0");
        }
        let fired = self.debouncer.observe(&self.reading);

        self.publish(Some(now));
        fired
    }

    /// Payload to submit if the daily snapshot is due at `now`.
    pub fn check_schedule(&mut self, now: DateTime<FixedOffset>) -> Option<SnapshotPayload> {
        // ---
        if !self.scheduler.due(now) {
            return None;
        }

        let payload = SnapshotPayload::new(&self.reading, now);
        self.publish(None);
        Some(payload)
    }

    fn publish(&self, updated_at: Option<DateTime<FixedOffset>>) {
        let reading = self.reading;
        let primed = self.seen.is_complete();
        let alerts: BTreeMap<_, _> = self.debouncer.states().collect();
        let last_snapshot = self.scheduler.last_fired();

        self.state_tx.send_modify(|state| {
            state.reading = reading;
            state.primed = primed;
            state.alerts = alerts;
            state.last_snapshot = last_snapshot;
            if updated_at.is_some() {
                state.updated_at = updated_at;
            }
        });
    }

    async fn run(
        mut self,
        settings: MonitorSettings,
        effects: Effects,
        mut updates: mpsc::Receiver<FieldUpdate>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        // ---
        let mut ticker = tokio::time::interval(settings.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut feed_open = true;

        tracing::info!("Monitor started");

        loop {
            // Pending updates are applied before a tick reads the snapshot.
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                update = updates.recv(), if feed_open => match update {
                    Some(update) => {
                        for notification in self.apply(update, settings.now()) {
                            tracing::info!(key = %notification.key, "alert raised");
                            effects::spawn_notification(
                                Arc::clone(&effects.notifier),
                                notification,
                                Arc::clone(&effects.report),
                            );
                        }
                    }
                    None => {
                        tracing::warn!("Sensor feed closed; no further readings");
                        feed_open = false;
                    }
                },
                _ = ticker.tick() => {
                    if let Some(payload) = self.check_schedule(settings.now()) {
                        tracing::info!("Saving daily log for {}", payload.created_at);
                        effects::spawn_snapshot(
                            Arc::clone(&effects.sink),
                            payload,
                            Arc::clone(&effects.report),
                        );
                    }
                }
            }
        }

        tracing::info!("Monitor stopped");
    }
}

/// Running session. Dropping the handle also ends it, without waiting for
/// the loop to exit.
pub struct MonitorHandle {
    state: watch::Receiver<MonitorState>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
    subscriptions: Vec<Subscription>,
}

impl MonitorHandle {
    pub fn state(&self) -> watch::Receiver<MonitorState> {
        self.state.clone()
    }

    /// Unsubscribe from the feed, stop the check tick and wait for the loop
    /// to exit. In-flight notifications and snapshots are left to finish.
    pub async fn stop(self) {
        // ---
        for sub in self.subscriptions {
            tracing::debug!(field = %sub.field(), "unsubscribing");
        }
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Monitor task ended abnormally: {}", e);
        }
    }
}

/// Start a monitoring session fed by `updates`. The subscriptions that
/// produce those updates are owned by the handle and dropped on stop.
pub fn start(
    settings: MonitorSettings,
    effects: Effects,
    updates: mpsc::Receiver<FieldUpdate>,
    subscriptions: Vec<Subscription>,
) -> MonitorHandle {
    // ---
    let (monitor, state) = Monitor::new();
    let (shutdown, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(monitor.run(settings, effects, updates, shutdown_rx));

    MonitorHandle {
        state,
        shutdown,
        task,
        subscriptions,
    }
}
