//! System monitoring core.
//!
//! A [`SamplingEngine`] polls the [`SensorSet`] on a fixed cadence, keeps a
//! rolling CPU/RAM history, raises peak alerts and publishes immutable
//! [`Snapshot`]s to a single consumer.

pub mod alerts;
pub mod engine;
pub mod history;
pub mod processes;
pub mod sensors;
pub mod snapshot;

pub use alerts::{
    evaluate_alerts, AlertEvent, AlertPolicy, AlertThresholds, Beeper, PeakLog, SilentBeeper,
    SystemBeeper,
};
pub use engine::{sleep_duration_for, EngineControl, EngineHandle, SamplingEngine};
pub use history::{MetricsHistory, RingSeries, DEFAULT_HISTORY_CAPACITY};
pub use processes::{
    classify_process, find_process, kill_process, top_processes, ProcessEntry, ProcessRisk,
};
pub use sensors::{
    select_disks, Diagnostics, DiagnosticsReport, GpuProvider, GpuVendor, HostProbe,
    HttpIdentityProbe, IdentityProbe, LatencyProbe, LatencyTracker, MemoryUsage, SensorKind,
    SensorReadings, SensorSet, SensorSetBuilder, StaticIdentity, SysinfoHostProbe,
    TcpLatencyProbe, VolumeInfo,
};
pub use snapshot::{
    DiskEntry, GpuSample, HistorySeries, Metric, NetworkIdentity, Reading, Snapshot,
    UNKNOWN_LOCAL_ADDRESS, UNKNOWN_PUBLIC_ADDRESS,
};
