//! Scripted probes shared by the integration tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use syspulse::core::config::EngineConfig;
use syspulse::core::system_monitor::{
    AlertPolicy, Beeper, DiskEntry, HostProbe, LatencyProbe, MemoryUsage, PeakLog,
    SamplingEngine, SensorSet, SensorSetBuilder,
};
use syspulse::error::{Result, SysPulseError};

pub const TOTAL_RAM: u64 = 100_000;

/// Host probe replaying a CPU script; `None` entries fail the CPU read
pub struct ScriptedHost {
    cpu: Vec<Option<f32>>,
    ram: MemoryUsage,
    delay: Duration,
    polls: Arc<AtomicUsize>,
}

impl ScriptedHost {
    pub fn constant(cpu: f32) -> Self {
        Self::with_script(vec![Some(cpu)])
    }

    pub fn with_script(cpu: Vec<Option<f32>>) -> Self {
        Self {
            cpu,
            ram: MemoryUsage {
                used_bytes: TOTAL_RAM / 2,
                total_bytes: TOTAL_RAM,
            },
            delay: Duration::ZERO,
            polls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn ram_used(mut self, used_bytes: u64) -> Self {
        self.ram.used_bytes = used_bytes;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn polls(&self) -> Arc<AtomicUsize> {
        self.polls.clone()
    }
}

impl HostProbe for ScriptedHost {
    fn cpu_percent(&mut self) -> Result<f32> {
        let index = self.polls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        self.cpu[index % self.cpu.len()]
            .ok_or_else(|| SysPulseError::metric_collection("scripted CPU failure"))
    }

    fn memory(&mut self) -> Result<MemoryUsage> {
        Ok(self.ram)
    }

    fn cpu_temperature(&mut self) -> Result<f32> {
        Err(SysPulseError::sensor_unavailable("no thermal zone"))
    }

    fn disks(&mut self) -> Result<Vec<DiskEntry>> {
        Ok(vec![DiskEntry {
            device_name: "disk0".to_string(),
            mount_point: "/".to_string(),
            total_bytes: 500_000_000_000,
            used_percent: 41.5,
        }])
    }

    fn battery_percent(&mut self) -> Result<Option<f32>> {
        Ok(Some(80.0))
    }
}

pub struct CountingLatency {
    pub calls: Arc<AtomicUsize>,
    pub millis: u64,
}

impl LatencyProbe for CountingLatency {
    fn measure(&mut self) -> Result<Duration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Duration::from_millis(self.millis))
    }
}

pub struct CountingBeeper {
    pub beeps: Arc<AtomicUsize>,
}

impl Beeper for CountingBeeper {
    fn beep(&self) -> Result<()> {
        self.beeps.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn config_for(log_dir: &Path, refresh_interval: f64) -> EngineConfig {
    EngineConfig {
        refresh_interval,
        peak_log_dir: log_dir.to_path_buf(),
        ..EngineConfig::default()
    }
}

/// Engine with the given sensors and a counting beeper; returns the beep counter
pub fn engine_with(
    sensors: SensorSetBuilder,
    log_dir: &Path,
    refresh_interval: f64,
) -> (SamplingEngine, Arc<AtomicUsize>) {
    let config = config_for(log_dir, refresh_interval);
    let beeps = Arc::new(AtomicUsize::new(0));
    let alerts = AlertPolicy::new(
        config.thresholds,
        PeakLog::new(log_dir),
        Box::new(CountingBeeper {
            beeps: beeps.clone(),
        }),
    );

    (SamplingEngine::new(&config, sensors.build(), alerts), beeps)
}

pub fn host_engine(
    host: ScriptedHost,
    log_dir: &Path,
    refresh_interval: f64,
) -> (SamplingEngine, Arc<AtomicUsize>) {
    engine_with(SensorSet::builder(Box::new(host)), log_dir, refresh_interval)
}

/// Polls `condition` until it holds or `timeout` elapses
pub fn wait_for<F: Fn() -> bool>(timeout: Duration, condition: F) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}
