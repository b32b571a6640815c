//! Threshold evaluation and notification debouncing.
//!
//! `thresholds` is pure band logic; `debounce` owns the per-key
//! Armed/Suppressed state for one monitoring session.

pub mod debounce;
pub mod thresholds;

pub use debounce::{AlertDebouncer, AlertState, Notification};
pub use thresholds::{active_conditions, cleared_conditions, AlertKey};
