//! Presentation models for the two screens: the live dashboard and the
//! historical log list. Pure functions of their inputs.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::alerts::{AlertKey, AlertState};
use crate::models::LogEntry;
use crate::monitor::MonitorState;
use crate::status::{
    live_leak_banner, live_leak_tone, log_severity, snap_to_10, Band, FlowStatus, LeakStatus,
    LivePhStatus, LogPhStatus, LogSeverity, TankStatus, Tone,
};

pub const EMPTY_LOGS_MESSAGE: &str = "No logs found.\nData is saved daily at midnight.";

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhCard {
    pub value: f64,
    pub display: String,
    pub status: Band,
    pub optimal_range: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub label: &'static str,
    pub value: f64,
    /// Needle position, in steps of 10%.
    pub snapped: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeakCard {
    pub label: &'static str,
    pub value: f64,
    pub tone: Tone,
    pub banner: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub title: &'static str,
    pub primed: bool,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub ph: PhCard,
    pub gas_flow: Gauge,
    pub leaks: [LeakCard; 2],
    pub tank: Gauge,
    pub alerts: BTreeMap<AlertKey, AlertState>,
    pub last_snapshot: Option<NaiveDate>,
}

pub fn dashboard(state: &MonitorState) -> DashboardView {
    // ---
    let r = &state.reading;
    let leak = |label, value: f64| LeakCard {
        label,
        value,
        tone: live_leak_tone(value),
        banner: live_leak_banner(value),
    };

    DashboardView {
        title: "Biogas Monitoring Dashboard",
        primed: state.primed,
        updated_at: state.updated_at,
        ph: PhCard {
            value: r.ph,
            display: format!("{:.2}", r.ph),
            status: LivePhStatus::from_ph(r.ph).band(),
            optimal_range: "6.5 – 7.5",
        },
        gas_flow: Gauge {
            label: "Gas Flow",
            value: r.gas_flow,
            snapped: snap_to_10(r.gas_flow),
        },
        leaks: [
            leak("Gas Leak Sensor 1", r.gas_leak1),
            leak("Gas Leak Sensor 2", r.gas_leak2),
        ],
        tank: Gauge {
            label: "Gas Meter (Tank Level)",
            value: r.gas_level,
            snapped: snap_to_10(r.gas_level),
        },
        alerts: state.alerts.clone(),
        last_snapshot: state.last_snapshot,
    }
}

// ---------------------------------------------------------------------------
// Log list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub label: &'static str,
    pub value: f64,
    pub display: String,
    pub unit: &'static str,
    pub status: Band,
    /// Fill of the mini bar, 0–100.
    pub bar_percent: f64,
}

fn metric(label: &'static str, value: f64, unit: &'static str, status: Band, max: f64) -> Metric {
    Metric {
        label,
        value,
        display: format!("{value:.2}"),
        unit,
        status,
        bar_percent: (value / max * 100.0).clamp(0.0, 100.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogCard {
    /// `#001`, `#002`, … in server order.
    pub number: String,
    pub id: Option<String>,
    pub severity: LogSeverity,
    pub date: String,
    pub time: String,
    pub timestamp: String,
    /// Summary pills: `PH 7.1`, `LVL 50%`.
    pub pills: [String; 2],
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListView {
    pub count: usize,
    pub summary: String,
    pub empty_message: Option<&'static str>,
    pub entries: Vec<LogCard>,
}

pub fn log_card(index: usize, entry: &LogEntry, offset: &FixedOffset) -> LogCard {
    // ---
    let r = entry.reading();
    let local = entry.created_at().map(|t| t.with_timezone(offset));
    let fmt = |pattern: &str| {
        local
            .map(|t| t.format(pattern).to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    LogCard {
        number: format!("#{:03}", index + 1),
        id: entry.id.clone(),
        severity: log_severity(&r),
        date: fmt("%b %d, %Y"),
        time: fmt("%I:%M:%S %p"),
        timestamp: fmt("%B %d, %Y, %I:%M:%S %p"),
        pills: [format!("PH {:.1}", r.ph), format!("LVL {}%", r.gas_level)],
        metrics: vec![
            metric("PH Level", r.ph, "pH", LogPhStatus::from_ph(r.ph).band(), 14.0),
            metric(
                "Gas Leak Sensor 1",
                r.gas_leak1,
                "%",
                LeakStatus::from_leak(r.gas_leak1).band(),
                100.0,
            ),
            metric(
                "Gas Leak Sensor 2",
                r.gas_leak2,
                "%",
                LeakStatus::from_leak(r.gas_leak2).band(),
                100.0,
            ),
            metric(
                "Gas Flow",
                r.gas_flow,
                "%",
                FlowStatus::from_flow(r.gas_flow).band(),
                100.0,
            ),
            metric(
                "Gas Level (Tank)",
                r.gas_level,
                "%",
                TankStatus::from_level(r.gas_level).band(),
                100.0,
            ),
        ],
    }
}

pub fn log_list(entries: &[LogEntry], offset: &FixedOffset) -> LogListView {
    // ---
    let count = entries.len();
    let plural = if count == 1 { "" } else { "s" };

    LogListView {
        count,
        summary: format!("{count} record{plural}"),
        empty_message: (count == 0).then_some(EMPTY_LOGS_MESSAGE),
        entries: entries
            .iter()
            .enumerate()
            .map(|(i, e)| log_card(i, e, offset))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::Reading;

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn entry(created_at: Option<&str>, reading: Reading) -> LogEntry {
        LogEntry {
            id: Some("abc".into()),
            ph: reading.ph,
            gas_leak1: reading.gas_leak1,
            gas_leak2: reading.gas_leak2,
            gas_flow: reading.gas_flow,
            gas_level: reading.gas_level,
            created_at: created_at.map(String::from),
        }
    }

    #[test]
    fn test_log_card_formats_in_local_time() {
        // ---
        let e = entry(
            Some("2026-10-15T16:00:05.000Z"),
            Reading {
                ph: 7.14,
                gas_flow: 40.0,
                gas_level: 50.0,
                gas_leak1: 12.0,
                gas_leak2: 3.0,
            },
        );
        let card = log_card(0, &e, &manila());

        assert_eq!(card.number, "#001");
        assert_eq!(card.date, "Oct 16, 2026");
        assert_eq!(card.time, "12:00:05 AM");
        assert_eq!(card.timestamp, "October 16, 2026, 12:00:05 AM");
        assert_eq!(card.pills, ["PH 7.1".to_string(), "LVL 50%".to_string()]);
        assert_eq!(card.severity, LogSeverity::Warning);
        assert_eq!(card.metrics[0].display, "7.14");
        assert_eq!(card.metrics[0].status.label, "OPTIMAL");
        assert!((card.metrics[0].bar_percent - 51.0).abs() < 0.01);
    }

    #[test]
    fn test_log_card_missing_timestamp_and_values() {
        // ---
        let card = log_card(41, &entry(None, Reading::default()), &manila());
        assert_eq!(card.number, "#042");
        assert_eq!(card.date, "-");
        assert_eq!(card.time, "-");
        assert_eq!(card.pills, ["PH 0.0".to_string(), "LVL 0%".to_string()]);

        let labels: Vec<_> = card.metrics.iter().map(|m| m.status.label).collect();
        assert_eq!(labels, vec!["ACIDIC", "NORMAL", "NORMAL", "STOPPED", "LOW"]);
    }

    #[test]
    fn test_log_list_summary_and_empty_state() {
        // ---
        let empty = log_list(&[], &manila());
        assert_eq!(empty.summary, "0 records");
        assert_eq!(empty.empty_message, Some(EMPTY_LOGS_MESSAGE));

        let one = log_list(&[LogEntry::default()], &manila());
        assert_eq!(one.summary, "1 record");
        assert!(one.empty_message.is_none());
    }

    #[test]
    fn test_dashboard_bands() {
        // ---
        let state = MonitorState {
            reading: Reading {
                ph: 6.2,
                gas_flow: 44.0,
                gas_level: 97.0,
                gas_leak1: 95.0,
                gas_leak2: 75.0,
            },
            ..MonitorState::default()
        };
        let view = dashboard(&state);

        assert_eq!(view.ph.display, "6.20");
        assert_eq!(view.ph.status.label, "ACIDIC");
        assert_eq!(view.gas_flow.snapped, 40.0);
        assert_eq!(view.tank.snapped, 100.0);
        assert_eq!(view.leaks[0].tone, Tone::Danger);
        assert_eq!(view.leaks[0].banner, Some("⚠ CRITICAL GAS LEAK"));
        assert_eq!(view.leaks[1].tone, Tone::Caution);
        assert_eq!(view.leaks[1].banner, None);
        assert_eq!(view.alerts.len(), 9);
    }
}
