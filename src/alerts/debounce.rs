//! Per-key alert debouncing.
//!
//! Every [`AlertKey`] is either [`AlertState::Armed`] (ready to notify) or
//! [`AlertState::Suppressed`] (already notified for the current excursion).
//! A key goes Armed→Suppressed the first time its trigger holds and only
//! returns to Armed when its clearing band is observed.

use std::collections::BTreeMap;

use serde::Serialize;

use super::thresholds::{active_conditions, cleared_conditions, AlertKey};
use crate::models::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    #[default]
    Armed,
    Suppressed,
}

/// A notification the caller should dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub key: AlertKey,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_key(key: AlertKey) -> Self {
        Notification {
            key,
            title: key.title().to_string(),
            body: key.body().to_string(),
        }
    }
}

/// Alert state for one monitoring session. Never persisted; a restart
/// re-arms every key.
#[derive(Debug, Clone)]
pub struct AlertDebouncer {
    states: BTreeMap<AlertKey, AlertState>,
}

impl Default for AlertDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertDebouncer {
    pub fn new() -> Self {
        AlertDebouncer {
            states: AlertKey::ALL
                .into_iter()
                .map(|k| (k, AlertState::Armed))
                .collect(),
        }
    }

    pub fn state(&self, key: AlertKey) -> AlertState {
        self.states.get(&key).copied().unwrap_or_default()
    }

    /// All keys with their current state, in evaluation order.
    pub fn states(&self) -> impl Iterator<Item = (AlertKey, AlertState)> + '_ {
        self.states.iter().map(|(k, s)| (*k, *s))
    }

    /// Feed one reading through the state machine.
    ///
    /// Triggers are applied before clears. The returned notifications are
    /// already accounted for: the keys are Suppressed whether or not the
    /// caller manages to deliver them.
    pub fn observe(&mut self, reading: &Reading) -> Vec<Notification> {
        // ---
        let mut fired = Vec::new();

        for key in active_conditions(reading) {
            if self.state(key) == AlertState::Armed {
                self.states.insert(key, AlertState::Suppressed);
                fired.push(Notification::for_key(key));
            }
        }

        for key in cleared_conditions(reading) {
            if self.state(key) == AlertState::Suppressed {
                tracing::debug!(key = %key, "alert re-armed");
                self.states.insert(key, AlertState::Armed);
            }
        }

        fired
    }
}
