//! Sensor probes and the set that polls them each cycle.
//!
//! Every probe is fallible on its own. Failures degrade to
//! [`Reading::Unavailable`] and are counted in [`Diagnostics`]; only the CPU
//! load and memory probes are required for a cycle to produce a snapshot.

mod gpu;
mod host;
mod latency;
mod network;

pub use gpu::{GpuProvider, GpuVendor};
pub use host::{select_disks, HostProbe, MemoryUsage, SysinfoHostProbe, VolumeInfo};
pub use latency::{LatencyProbe, LatencyTracker, TcpLatencyProbe};
pub use network::{local_address, parse_ip_echo, HttpIdentityProbe, IdentityProbe, StaticIdentity};

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::snapshot::{DiskEntry, GpuSample, NetworkIdentity, Reading};
use crate::core::config::EngineConfig;
use crate::error::{Result, SysPulseError};
use crate::platform::gpu::get_gpu_provider;

/// Individual probes tracked by the diagnostic counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SensorKind {
    Cpu,
    Memory,
    CpuTemperature,
    Disks,
    Gpu,
    Battery,
    Latency,
    NetworkIdentity,
}

impl SensorKind {
    pub const ALL: [SensorKind; 8] = [
        SensorKind::Cpu,
        SensorKind::Memory,
        SensorKind::CpuTemperature,
        SensorKind::Disks,
        SensorKind::Gpu,
        SensorKind::Battery,
        SensorKind::Latency,
        SensorKind::NetworkIdentity,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Failure counters shared between the sampling thread and control callers
#[derive(Debug, Default)]
pub struct Diagnostics {
    failures: [AtomicU64; 8],
    cycle_failures: AtomicU64,
    cycles_published: AtomicU64,
}

impl Diagnostics {
    pub fn record_failure(&self, kind: SensorKind) {
        self.failures[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn failures(&self, kind: SensorKind) -> u64 {
        self.failures[kind.index()].load(Ordering::Relaxed)
    }

    pub fn record_cycle_failure(&self) {
        self.cycle_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cycle_failures(&self) -> u64 {
        self.cycle_failures.load(Ordering::Relaxed)
    }

    pub fn record_published(&self) {
        self.cycles_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cycles_published(&self) -> u64 {
        self.cycles_published.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> DiagnosticsReport {
        DiagnosticsReport {
            sensor_failures: SensorKind::ALL
                .iter()
                .map(|&kind| (kind, self.failures(kind)))
                .filter(|(_, count)| *count > 0)
                .collect(),
            cycle_failures: self.cycle_failures(),
            cycles_published: self.cycles_published(),
        }
    }
}

/// Point-in-time copy of [`Diagnostics`]
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub sensor_failures: Vec<(SensorKind, u64)>,
    pub cycle_failures: u64,
    pub cycles_published: u64,
}

/// Converts a probe result into a reading. Missing sensors are expected and
/// not counted; any other error is.
fn degrade<T>(diagnostics: &Diagnostics, kind: SensorKind, result: Result<T>) -> Reading<T> {
    match result {
        Ok(value) => Reading::Value(value),
        Err(SysPulseError::SensorUnavailable(_)) => Reading::Unavailable,
        Err(e) => {
            log::debug!("{:?} probe failed: {}", kind, e);
            diagnostics.record_failure(kind);
            Reading::Unavailable
        }
    }
}

/// Everything read from the sensors in one cycle
#[derive(Debug, Clone)]
pub struct SensorReadings {
    pub cpu_percent: f32,
    pub memory: MemoryUsage,
    pub cpu_temp_celsius: Reading<f32>,
    pub disks: Vec<DiskEntry>,
    pub gpu: Option<GpuSample>,
    pub battery_percent: Option<f32>,
    pub latency_ms: Reading<u32>,
}

type GpuInit = Box<dyn FnOnce() -> Result<Box<dyn GpuProvider>>>;

/// Builder for a [`SensorSet`] with custom probes.
///
/// Probes that are not supplied are disabled: no GPU, no latency measurement
/// and a placeholder network identity.
pub struct SensorSetBuilder {
    host: Box<dyn HostProbe>,
    gpu_init: Option<GpuInit>,
    latency_probe: Option<Box<dyn LatencyProbe>>,
    latency_stride: u64,
    identity: Box<dyn IdentityProbe>,
}

impl SensorSetBuilder {
    /// Hook used once, at build time, to open the GPU management library
    pub fn gpu_init<F>(mut self, init: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn GpuProvider>> + 'static,
    {
        self.gpu_init = Some(Box::new(init));
        self
    }

    pub fn latency_probe(mut self, probe: Box<dyn LatencyProbe>, stride: u64) -> Self {
        self.latency_probe = Some(probe);
        self.latency_stride = stride;
        self
    }

    pub fn identity_probe(mut self, identity: Box<dyn IdentityProbe>) -> Self {
        self.identity = identity;
        self
    }

    pub fn build(self) -> SensorSet {
        let gpu = match self.gpu_init {
            Some(init) => match init() {
                Ok(provider) => {
                    log::info!("GPU available: {} ({:?})", provider.name(), provider.vendor());
                    Some(provider)
                }
                Err(e) => {
                    log::info!("GPU monitoring disabled: {}", e);
                    None
                }
            },
            None => None,
        };

        SensorSet {
            host: self.host,
            gpu,
            latency: LatencyTracker::new(self.latency_probe, self.latency_stride),
            identity: self.identity,
            diagnostics: Arc::new(Diagnostics::default()),
        }
    }
}

/// The collection of probes polled by the sampling engine
pub struct SensorSet {
    host: Box<dyn HostProbe>,
    gpu: Option<Box<dyn GpuProvider>>,
    latency: LatencyTracker,
    identity: Box<dyn IdentityProbe>,
    diagnostics: Arc<Diagnostics>,
}

impl SensorSet {
    pub fn builder(host: Box<dyn HostProbe>) -> SensorSetBuilder {
        SensorSetBuilder {
            host,
            gpu_init: None,
            latency_probe: None,
            latency_stride: 1,
            identity: Box::new(StaticIdentity::new(NetworkIdentity::unknown())),
        }
    }

    /// Probes backed by the operating system, the GPU vendor library and the network
    pub fn system(config: &EngineConfig) -> Self {
        Self::builder(Box::new(SysinfoHostProbe::new()))
            .gpu_init(get_gpu_provider)
            .latency_probe(
                Box::new(TcpLatencyProbe::new(
                    config.latency_target,
                    config.latency_timeout,
                )),
                config.latency_stride,
            )
            .identity_probe(Box::new(HttpIdentityProbe::new(
                config.public_ip_url.clone(),
                config.latency_target,
                config.public_ip_timeout,
            )))
            .build()
    }

    pub fn diagnostics(&self) -> Arc<Diagnostics> {
        self.diagnostics.clone()
    }

    pub fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn gpu_name(&self) -> Option<String> {
        self.gpu.as_ref().map(|gpu| gpu.name())
    }

    /// Resolves local and public addresses. Any failure yields placeholders
    /// for both.
    pub fn resolve_identity(&mut self) -> NetworkIdentity {
        match self.identity.resolve() {
            Ok(identity) => identity,
            Err(e) => {
                log::debug!("Network identity lookup failed: {}", e);
                self.diagnostics.record_failure(SensorKind::NetworkIdentity);
                NetworkIdentity::unknown()
            }
        }
    }

    /// Reads every probe once.
    ///
    /// Fails only when the CPU load or memory probe fails.
    pub fn poll(&mut self) -> Result<SensorReadings> {
        let diagnostics = self.diagnostics.as_ref();

        let cpu_percent = self.host.cpu_percent().inspect_err(|_| {
            diagnostics.record_failure(SensorKind::Cpu);
        })?;
        let memory = self.host.memory().inspect_err(|_| {
            diagnostics.record_failure(SensorKind::Memory);
        })?;

        let cpu_temp_celsius = degrade(
            diagnostics,
            SensorKind::CpuTemperature,
            self.host.cpu_temperature(),
        );

        let disks = match degrade(diagnostics, SensorKind::Disks, self.host.disks()) {
            Reading::Value(disks) => disks,
            Reading::Unavailable => Vec::new(),
        };

        let gpu = self.gpu.as_mut().map(|gpu| GpuSample {
            name: gpu.name(),
            utilization_percent: degrade(diagnostics, SensorKind::Gpu, gpu.utilization_percent()),
            temperature_celsius: degrade(diagnostics, SensorKind::Gpu, gpu.temperature_celsius()),
            vram_percent: degrade(diagnostics, SensorKind::Gpu, gpu.vram_percent()),
        });

        let battery_percent = match degrade(
            diagnostics,
            SensorKind::Battery,
            self.host.battery_percent(),
        ) {
            Reading::Value(percent) => percent,
            Reading::Unavailable => None,
        };

        let latency_ms = self.latency.tick(diagnostics);

        Ok(SensorReadings {
            cpu_percent,
            memory,
            cpu_temp_celsius,
            disks,
            gpu,
            battery_percent,
            latency_ms,
        })
    }

    /// Releases hardware handles. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(mut gpu) = self.gpu.take() {
            if let Err(e) = gpu.shutdown() {
                log::debug!("GPU shutdown failed: {}", e);
            }
        }
    }
}

impl Drop for SensorSet {
    fn drop(&mut self) {
        self.shutdown();
    }
}
