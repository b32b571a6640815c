//! Data models shared by the feed, the alerting path and the log API.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---

/// One of the five realtime values published under `sensors/` in the
/// realtime database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorField {
    Ph,
    GasFlow,
    GasLevel,
    GasLeak1,
    GasLeak2,
}

impl SensorField {
    pub const ALL: [SensorField; 5] = [
        SensorField::Ph,
        SensorField::GasFlow,
        SensorField::GasLevel,
        SensorField::GasLeak1,
        SensorField::GasLeak2,
    ];

    /// Key of the value under `sensors/` in the realtime database.
    pub fn key(self) -> &'static str {
        match self {
            SensorField::Ph => "ph",
            SensorField::GasFlow => "gasFlow",
            SensorField::GasLevel => "gasLevel",
            SensorField::GasLeak1 => "gasLeak1",
            SensorField::GasLeak2 => "gasLeak2",
        }
    }

    fn bit(self) -> u8 {
        match self {
            SensorField::Ph => 1,
            SensorField::GasFlow => 1 << 1,
            SensorField::GasLevel => 1 << 2,
            SensorField::GasLeak1 => 1 << 3,
            SensorField::GasLeak2 => 1 << 4,
        }
    }
}

impl std::fmt::Display for SensorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Latest value of every sensor. Percentages are 0–100, pH is 0–14.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    // ---
    pub ph: f64,
    pub gas_flow: f64,
    pub gas_level: f64,
    pub gas_leak1: f64,
    pub gas_leak2: f64,
}

impl Reading {
    pub fn set(&mut self, field: SensorField, value: f64) {
        match field {
            SensorField::Ph => self.ph = value,
            SensorField::GasFlow => self.gas_flow = value,
            SensorField::GasLevel => self.gas_level = value,
            SensorField::GasLeak1 => self.gas_leak1 = value,
            SensorField::GasLeak2 => self.gas_leak2 = value,
        }
    }
}

/// Set of fields that have reported at least once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSet(u8);

impl FieldSet {
    pub fn insert(&mut self, field: SensorField) {
        self.0 |= field.bit();
    }

    pub fn contains(&self, field: SensorField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_complete(&self) -> bool {
        SensorField::ALL.iter().all(|f| self.contains(*f))
    }
}

/// A single emission from one sensor subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldUpdate {
    pub field: SensorField,
    pub value: f64,
}

/// Coerce a raw realtime-database value to a sensor number.
///
/// Numbers pass through, numeric strings are parsed, booleans map to 1/0.
/// Anything else (null, objects, garbage strings, NaN/inf) becomes 0.
pub fn coerce_sensor_value(raw: &Value) -> f64 {
    // ---
    let value = match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// ---

/// Body of `POST /api/saveLogs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    // ---
    pub ph: f64,
    pub gas_leak1: f64,
    pub gas_leak2: f64,
    pub gas_flow: f64,
    pub gas_level: f64,
    /// ISO-8601 with the installation's local offset, millisecond precision.
    pub created_at: String,
}

impl SnapshotPayload {
    pub fn new(reading: &Reading, now: DateTime<FixedOffset>) -> Self {
        // ---
        SnapshotPayload {
            ph: reading.ph,
            gas_leak1: reading.gas_leak1,
            gas_leak2: reading.gas_leak2,
            gas_flow: reading.gas_flow,
            gas_level: reading.gas_level,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}

/// One stored snapshot as returned by `GET /api/showLogs`.
///
/// Server records are loosely typed: any numeric field may be missing,
/// null or a string, and is read as 0 in that case. A `createdAt` that is
/// neither a string nor epoch milliseconds is dropped, not the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawLogEntry")]
pub struct LogEntry {
    // ---
    pub id: Option<String>,
    pub ph: f64,
    pub gas_leak1: f64,
    pub gas_leak2: f64,
    pub gas_flow: f64,
    pub gas_level: f64,
    pub created_at: Option<String>,
}

/// Wire shape of a stored record. Mongo-style `_id` wins over `id`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLogEntry {
    #[serde(default, rename = "_id", deserialize_with = "lenient_id")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    ph: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    gas_leak1: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    gas_leak2: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    gas_flow: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    gas_level: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<String>,
}

impl From<RawLogEntry> for LogEntry {
    fn from(raw: RawLogEntry) -> Self {
        LogEntry {
            id: raw.object_id.or(raw.id),
            ph: raw.ph,
            gas_leak1: raw.gas_leak1,
            gas_leak2: raw.gas_leak2,
            gas_flow: raw.gas_flow,
            gas_level: raw.gas_level,
            created_at: raw.created_at,
        }
    }
}

impl LogEntry {
    pub fn reading(&self) -> Reading {
        Reading {
            ph: self.ph,
            gas_flow: self.gas_flow,
            gas_level: self.gas_level,
            gas_leak1: self.gas_leak1,
            gas_leak2: self.gas_leak2,
        }
    }

    /// Parsed `createdAt`, or `None` if it is missing or unparseable.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_sensor_value(&raw))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Strings pass through; numbers are epoch milliseconds.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(s) => Some(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        _ => None,
    })
}
