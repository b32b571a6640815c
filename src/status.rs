//! Status bands for display.
//!
//! Two band sets exist and they do not agree on labels: the live dashboard
//! (`Live*`) and the historical log view (`Log*`). Both use the same
//! numeric edges as the alert thresholds, except log-view flow which has an
//! extra LOW band under 30%.

use serde::Serialize;

use crate::alerts::thresholds::{
    LEAK_CRITICAL, LEAK_WARNING, PH_HIGH, PH_LOW, PH_OPTIMAL_MAX, PH_OPTIMAL_MIN, TANK_FULL,
    TANK_LOW,
};
use crate::models::Reading;

/// Flow below this (and above zero) shows as LOW in the log view.
pub const FLOW_LOW: f64 = 30.0;

/// Visual weight of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Good,
    Caution,
    Danger,
    Info,
}

/// A band label with its tone, as rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Band {
    pub label: &'static str,
    pub tone: Tone,
}

// ---------------------------------------------------------------------------
// Live dashboard bands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivePhStatus {
    StrongAcidic,
    Acidic,
    Optimal,
    Alkaline,
    StrongAlkaline,
}

impl LivePhStatus {
    pub fn from_ph(v: f64) -> Self {
        if v < PH_LOW {
            LivePhStatus::StrongAcidic
        } else if v < PH_OPTIMAL_MIN {
            LivePhStatus::Acidic
        } else if v <= PH_OPTIMAL_MAX {
            LivePhStatus::Optimal
        } else if v <= PH_HIGH {
            LivePhStatus::Alkaline
        } else {
            LivePhStatus::StrongAlkaline
        }
    }

    pub fn band(self) -> Band {
        match self {
            LivePhStatus::StrongAcidic => Band {
                label: "STRONG ACIDIC",
                tone: Tone::Danger,
            },
            LivePhStatus::Acidic => Band {
                label: "ACIDIC",
                tone: Tone::Caution,
            },
            LivePhStatus::Optimal => Band {
                label: "OPTIMAL",
                tone: Tone::Good,
            },
            LivePhStatus::Alkaline => Band {
                label: "ALKALINE",
                tone: Tone::Caution,
            },
            LivePhStatus::StrongAlkaline => Band {
                label: "STRONG ALKALINE",
                tone: Tone::Danger,
            },
        }
    }
}

/// Live leak card colour. Critical cards also carry a banner.
pub fn live_leak_tone(v: f64) -> Tone {
    if v >= LEAK_CRITICAL {
        Tone::Danger
    } else if v >= LEAK_WARNING {
        Tone::Caution
    } else {
        Tone::Good
    }
}

pub fn live_leak_banner(v: f64) -> Option<&'static str> {
    (v >= LEAK_CRITICAL).then_some("⚠ CRITICAL GAS LEAK")
}

/// Gauges move in steps of 10%. Halves round up.
pub fn snap_to_10(v: f64) -> f64 {
    (v / 10.0 + 0.5).floor() * 10.0
}

// ---------------------------------------------------------------------------
// Log view bands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogPhStatus {
    Acidic,
    Low,
    Optimal,
    High,
    Alkaline,
}

impl LogPhStatus {
    pub fn from_ph(v: f64) -> Self {
        if v < PH_LOW {
            LogPhStatus::Acidic
        } else if v < PH_OPTIMAL_MIN {
            LogPhStatus::Low
        } else if v <= PH_OPTIMAL_MAX {
            LogPhStatus::Optimal
        } else if v <= PH_HIGH {
            LogPhStatus::High
        } else {
            LogPhStatus::Alkaline
        }
    }

    pub fn band(self) -> Band {
        let (label, tone) = match self {
            LogPhStatus::Acidic => ("ACIDIC", Tone::Danger),
            LogPhStatus::Low => ("LOW", Tone::Caution),
            LogPhStatus::Optimal => ("OPTIMAL", Tone::Good),
            LogPhStatus::High => ("HIGH", Tone::Caution),
            LogPhStatus::Alkaline => ("ALKALINE", Tone::Danger),
        };
        Band { label, tone }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeakStatus {
    Normal,
    Warning,
    Critical,
}

impl LeakStatus {
    pub fn from_leak(v: f64) -> Self {
        if v >= LEAK_CRITICAL {
            LeakStatus::Critical
        } else if v >= LEAK_WARNING {
            LeakStatus::Warning
        } else {
            LeakStatus::Normal
        }
    }

    pub fn band(self) -> Band {
        let (label, tone) = match self {
            LeakStatus::Normal => ("NORMAL", Tone::Good),
            LeakStatus::Warning => ("WARNING", Tone::Caution),
            LeakStatus::Critical => ("CRITICAL", Tone::Danger),
        };
        Band { label, tone }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TankStatus {
    Low,
    Ok,
    Full,
}

impl TankStatus {
    pub fn from_level(v: f64) -> Self {
        if v < TANK_LOW {
            TankStatus::Low
        } else if v > TANK_FULL {
            TankStatus::Full
        } else {
            TankStatus::Ok
        }
    }

    pub fn band(self) -> Band {
        let (label, tone) = match self {
            TankStatus::Low => ("LOW", Tone::Danger),
            TankStatus::Ok => ("OK", Tone::Good),
            TankStatus::Full => ("FULL", Tone::Info),
        };
        Band { label, tone }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
    Stopped,
    Low,
    Flowing,
}

impl FlowStatus {
    pub fn from_flow(v: f64) -> Self {
        if v == 0.0 {
            FlowStatus::Stopped
        } else if v < FLOW_LOW {
            FlowStatus::Low
        } else {
            FlowStatus::Flowing
        }
    }

    pub fn band(self) -> Band {
        let (label, tone) = match self {
            FlowStatus::Stopped => ("STOPPED", Tone::Danger),
            FlowStatus::Low => ("LOW", Tone::Caution),
            FlowStatus::Flowing => ("FLOWING", Tone::Good),
        };
        Band { label, tone }
    }
}

/// Overall severity of one stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSeverity {
    Normal,
    Warning,
    Alert,
}

/// Band labels that do not raise a log card to Warning.
///
/// The leak labels are not in this set, so a NORMAL leak band still counts.
/// As a result every record without a critical leak shows as Warning.
pub const HEALTHY_LOG_LABELS: [&str; 4] = ["OPTIMAL", "OK", "FLOWING", "FULL"];

/// Alert if either leak sensor is critical. Otherwise Warning if any band
/// label falls outside [`HEALTHY_LOG_LABELS`], and Normal if none does.
pub fn log_severity(reading: &Reading) -> LogSeverity {
    // ---
    let leak1 = LeakStatus::from_leak(reading.gas_leak1);
    let leak2 = LeakStatus::from_leak(reading.gas_leak2);

    if leak1 == LeakStatus::Critical || leak2 == LeakStatus::Critical {
        return LogSeverity::Alert;
    }

    let bands = [
        LogPhStatus::from_ph(reading.ph).band(),
        leak1.band(),
        leak2.band(),
        TankStatus::from_level(reading.gas_level).band(),
        FlowStatus::from_flow(reading.gas_flow).band(),
    ];

    if bands
        .iter()
        .any(|b| !HEALTHY_LOG_LABELS.contains(&b.label))
    {
        LogSeverity::Warning
    } else {
        LogSeverity::Normal
    }
}
