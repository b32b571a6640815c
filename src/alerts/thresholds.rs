//! Trigger and clearing bands for every alert key.
//!
//! Clearing bands are evaluated on their own and are narrower than the
//! complement of the trigger bands, which leaves a hysteresis gap:
//!
//! | Keys                          | Trigger                  | Clear             |
//! |-------------------------------|--------------------------|-------------------|
//! | `ph_low` / `ph_high`          | pH < 6.0 / pH > 8.5      | 6.5 ≤ pH ≤ 7.5    |
//! | `gasN_critical`               | leak ≥ 90                | leak < 70         |
//! | `gasN_warning`                | 70 ≤ leak < 90           | leak < 70         |
//! | `tank_low` / `tank_full`      | level < 20 / level > 95  | 20 ≤ level ≤ 95   |
//! | `flow_zero`                   | flow == 0                | flow > 0          |
//!
//! A pH of 6.2 neither triggers nor clears `ph_low`.

use serde::Serialize;

use crate::models::Reading;

pub const PH_LOW: f64 = 6.0;
pub const PH_HIGH: f64 = 8.5;
pub const PH_OPTIMAL_MIN: f64 = 6.5;
pub const PH_OPTIMAL_MAX: f64 = 7.5;

pub const LEAK_WARNING: f64 = 70.0;
pub const LEAK_CRITICAL: f64 = 90.0;

pub const TANK_LOW: f64 = 20.0;
pub const TANK_FULL: f64 = 95.0;

// ---

/// Named alert condition. Ordering follows evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKey {
    PhLow,
    PhHigh,
    Gas1Critical,
    Gas2Critical,
    Gas1Warning,
    Gas2Warning,
    TankLow,
    TankFull,
    FlowZero,
}

impl AlertKey {
    pub const ALL: [AlertKey; 9] = [
        AlertKey::PhLow,
        AlertKey::PhHigh,
        AlertKey::Gas1Critical,
        AlertKey::Gas2Critical,
        AlertKey::Gas1Warning,
        AlertKey::Gas2Warning,
        AlertKey::TankLow,
        AlertKey::TankFull,
        AlertKey::FlowZero,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertKey::PhLow => "ph_low",
            AlertKey::PhHigh => "ph_high",
            AlertKey::Gas1Critical => "gas1_critical",
            AlertKey::Gas2Critical => "gas2_critical",
            AlertKey::Gas1Warning => "gas1_warning",
            AlertKey::Gas2Warning => "gas2_warning",
            AlertKey::TankLow => "tank_low",
            AlertKey::TankFull => "tank_full",
            AlertKey::FlowZero => "flow_zero",
        }
    }

    /// Notification title shown for this key.
    pub fn title(self) -> &'static str {
        match self {
            AlertKey::PhLow | AlertKey::PhHigh => "🚨 PH Critical",
            AlertKey::Gas1Critical | AlertKey::Gas2Critical => "🚨 Gas Leak Detected",
            AlertKey::Gas1Warning | AlertKey::Gas2Warning => "⚠ Gas Leak Warning",
            AlertKey::TankLow => "⚠ Gas Level Low",
            AlertKey::TankFull => "⚠ Gas Tank Full",
            AlertKey::FlowZero => "⚠ Gas Flow Stopped",
        }
    }

    /// Notification body shown for this key.
    pub fn body(self) -> &'static str {
        match self {
            AlertKey::PhLow => "Slurry PH is dangerously acidic!",
            AlertKey::PhHigh => "Slurry PH is dangerously alkaline!",
            AlertKey::Gas1Critical => "Gas Leak Sensor 1 is CRITICAL",
            AlertKey::Gas2Critical => "Gas Leak Sensor 2 is CRITICAL",
            AlertKey::Gas1Warning => "Gas Leak Sensor 1 is rising",
            AlertKey::Gas2Warning => "Gas Leak Sensor 2 is rising",
            AlertKey::TankLow => "Gas tank is below 20%",
            AlertKey::TankFull => "Gas tank is almost full",
            AlertKey::FlowZero => "No gas flow detected",
        }
    }

    /// Trigger predicate.
    pub fn is_triggered(self, r: &Reading) -> bool {
        match self {
            AlertKey::PhLow => r.ph < PH_LOW,
            AlertKey::PhHigh => r.ph > PH_HIGH,
            AlertKey::Gas1Critical => r.gas_leak1 >= LEAK_CRITICAL,
            AlertKey::Gas2Critical => r.gas_leak2 >= LEAK_CRITICAL,
            AlertKey::Gas1Warning => is_leak_warning(r.gas_leak1),
            AlertKey::Gas2Warning => is_leak_warning(r.gas_leak2),
            AlertKey::TankLow => r.gas_level < TANK_LOW,
            AlertKey::TankFull => r.gas_level > TANK_FULL,
            AlertKey::FlowZero => r.gas_flow == 0.0,
        }
    }

    /// Clearing predicate. Not the negation of [`AlertKey::is_triggered`].
    pub fn is_cleared(self, r: &Reading) -> bool {
        match self {
            AlertKey::PhLow | AlertKey::PhHigh => {
                (PH_OPTIMAL_MIN..=PH_OPTIMAL_MAX).contains(&r.ph)
            }
            AlertKey::Gas1Critical | AlertKey::Gas1Warning => r.gas_leak1 < LEAK_WARNING,
            AlertKey::Gas2Critical | AlertKey::Gas2Warning => r.gas_leak2 < LEAK_WARNING,
            AlertKey::TankLow | AlertKey::TankFull => {
                (TANK_LOW..=TANK_FULL).contains(&r.gas_level)
            }
            AlertKey::FlowZero => r.gas_flow > 0.0,
        }
    }
}

impl std::fmt::Display for AlertKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_leak_warning(v: f64) -> bool {
    (LEAK_WARNING..LEAK_CRITICAL).contains(&v)
}

/// Keys whose trigger predicate holds for `reading`, in evaluation order.
pub fn active_conditions(reading: &Reading) -> Vec<AlertKey> {
    AlertKey::ALL
        .into_iter()
        .filter(|k| k.is_triggered(reading))
        .collect()
}

/// Keys whose clearing predicate holds for `reading`.
pub fn cleared_conditions(reading: &Reading) -> Vec<AlertKey> {
    AlertKey::ALL
        .into_iter()
        .filter(|k| k.is_cleared(reading))
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn healthy() -> Reading {
        Reading {
            ph: 7.0,
            gas_flow: 40.0,
            gas_level: 50.0,
            gas_leak1: 10.0,
            gas_leak2: 10.0,
        }
    }

    #[test]
    fn test_healthy_reading_has_no_conditions() {
        assert!(active_conditions(&healthy()).is_empty());
        assert_eq!(cleared_conditions(&healthy()), AlertKey::ALL.to_vec());
    }

    #[test]
    fn test_all_zero_reading() {
        // ---
        // What an empty feed looks like: acidic, empty tank, no flow.
        let active = active_conditions(&Reading::default());
        assert_eq!(
            active,
            vec![AlertKey::PhLow, AlertKey::TankLow, AlertKey::FlowZero]
        );
    }

    #[test]
    fn test_ph_bands() {
        // ---
        let at = |ph| Reading { ph, ..healthy() };

        assert!(AlertKey::PhLow.is_triggered(&at(5.9)));
        assert!(!AlertKey::PhLow.is_triggered(&at(6.0)));
        assert!(AlertKey::PhHigh.is_triggered(&at(8.6)));
        assert!(!AlertKey::PhHigh.is_triggered(&at(8.5)));

        // Dead zones on both sides of the optimal band.
        for ph in [6.0, 6.2, 6.49, 7.51, 8.0, 8.5] {
            assert!(!AlertKey::PhLow.is_triggered(&at(ph)), "ph {ph}");
            assert!(!AlertKey::PhLow.is_cleared(&at(ph)), "ph {ph}");
            assert!(!AlertKey::PhHigh.is_cleared(&at(ph)), "ph {ph}");
        }
        assert!(AlertKey::PhLow.is_cleared(&at(6.5)));
        assert!(AlertKey::PhHigh.is_cleared(&at(7.5)));
    }

    #[test]
    fn test_critical_leak_supersedes_warning() {
        // ---
        let r = Reading {
            gas_leak1: 95.0,
            ..healthy()
        };
        assert!(AlertKey::Gas1Critical.is_triggered(&r));
        assert!(!AlertKey::Gas1Warning.is_triggered(&r));
        assert!(!AlertKey::Gas2Critical.is_triggered(&r));
    }

    #[test]
    fn test_leak_warning_band_edges() {
        // ---
        let at = |v| Reading {
            gas_leak2: v,
            ..healthy()
        };
        assert!(!AlertKey::Gas2Warning.is_triggered(&at(69.9)));
        assert!(AlertKey::Gas2Warning.is_triggered(&at(70.0)));
        assert!(AlertKey::Gas2Warning.is_triggered(&at(89.9)));
        assert!(!AlertKey::Gas2Warning.is_triggered(&at(90.0)));
        assert!(AlertKey::Gas2Critical.is_triggered(&at(90.0)));

        // Both leak keys for a sensor clear together, and only below 70.
        assert!(AlertKey::Gas2Critical.is_cleared(&at(69.0)));
        assert!(AlertKey::Gas2Warning.is_cleared(&at(69.0)));
        assert!(!AlertKey::Gas2Critical.is_cleared(&at(75.0)));
    }

    #[test]
    fn test_tank_and_flow_bands() {
        // ---
        let tank = |v| Reading {
            gas_level: v,
            ..healthy()
        };
        assert!(AlertKey::TankLow.is_triggered(&tank(19.9)));
        assert!(AlertKey::TankLow.is_cleared(&tank(20.0)));
        assert!(AlertKey::TankFull.is_triggered(&tank(95.1)));
        assert!(AlertKey::TankFull.is_cleared(&tank(95.0)));

        let flow = |v| Reading {
            gas_flow: v,
            ..healthy()
        };
        assert!(AlertKey::FlowZero.is_triggered(&flow(0.0)));
        assert!(!AlertKey::FlowZero.is_cleared(&flow(0.0)));
        assert!(AlertKey::FlowZero.is_cleared(&flow(5.0)));
    }

    #[test]
    fn test_key_names_and_messages() {
        // ---
        assert_eq!(AlertKey::Gas1Critical.to_string(), "gas1_critical");
        assert_eq!(
            serde_json::to_string(&AlertKey::TankFull).unwrap(),
            "\"tank_full\""
        );
        assert_eq!(AlertKey::PhHigh.title(), "🚨 PH Critical");
        assert_eq!(AlertKey::FlowZero.body(), "No gas flow detected");
    }
}
