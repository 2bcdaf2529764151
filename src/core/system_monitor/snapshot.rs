use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Placeholder used when the local address cannot be resolved.
pub const UNKNOWN_LOCAL_ADDRESS: &str = "127.0.0.1";
/// Placeholder used when the public address lookup fails.
pub const UNKNOWN_PUBLIC_ADDRESS: &str = "Unknown";

/// Outcome of a single probe: either a value or an explicit "unavailable" marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Reading<T> {
    Value(T),
    #[default]
    Unavailable,
}

impl<T> Reading<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Reading::Value(value),
            Err(_) => Reading::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Value(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(value) => Some(value),
            Reading::Unavailable => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Reading::Value(value) => Reading::Value(f(value)),
            Reading::Unavailable => Reading::Unavailable,
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Reading::Unavailable, Reading::Value)
    }
}

/// Metrics that keep a rolling history and are checked against alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Cpu,
    Ram,
}

impl Metric {
    /// Label used in peak log lines and terminal output
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cpu => "CPU",
            Metric::Ram => "RAM",
        }
    }
}

/// One usage entry per fixed or writable volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskEntry {
    pub device_name: String,
    pub mount_point: String,
    pub total_bytes: u64,
    pub used_percent: f32,
}

/// Per-cycle GPU readings. Present only when a GPU was found at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuSample {
    pub name: String,
    pub utilization_percent: Reading<f32>,
    pub temperature_celsius: Reading<f32>,
    pub vram_percent: Reading<f32>,
}

/// Addresses resolved once when the engine starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentity {
    pub local_address: String,
    pub public_address: String,
}

impl NetworkIdentity {
    pub fn unknown() -> Self {
        Self {
            local_address: UNKNOWN_LOCAL_ADDRESS.to_string(),
            public_address: UNKNOWN_PUBLIC_ADDRESS.to_string(),
        }
    }
}

impl Default for NetworkIdentity {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Ordered copies of the CPU and RAM history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub cpu: Vec<f32>,
    pub ram: Vec<f32>,
}

/// Complete, immutable result of one sampling cycle.
///
/// Published to consumers behind an `Arc`, so nothing downstream can mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    /// Zero-based index of the cycle that produced this snapshot
    pub cycle: u64,
    pub cpu_percent: f32,
    pub cpu_temp_celsius: Reading<f32>,
    pub ram_percent: f32,
    pub ram_used_bytes: u64,
    pub ram_total_bytes: u64,
    pub gpu: Option<GpuSample>,
    /// `None` on hosts without a battery
    pub battery_percent: Option<f32>,
    pub disks: Vec<DiskEntry>,
    pub network: NetworkIdentity,
    pub latency_ms: Reading<u32>,
    pub history: HistorySeries,
}

impl Snapshot {
    pub fn value_of(&self, metric: Metric) -> f32 {
        match metric {
            Metric::Cpu => self.cpu_percent,
            Metric::Ram => self.ram_percent,
        }
    }
}
