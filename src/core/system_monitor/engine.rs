//! The sampling engine: a single background thread that polls the sensors on
//! a fixed cadence and publishes one immutable [`Snapshot`] per cycle.
//!
//! Cycle body:
//! 1. poll the sensor set (latency only every Nth cycle)
//! 2. append CPU and RAM to the history
//! 3. evaluate alerts and dispatch their side effects
//! 4. assemble the snapshot
//! 5. hand it to the consumer callback
//!
//! Errors and panics are caught at the cycle boundary and the loop goes on.
//! Between cycles the thread sleeps `max(0.1, refresh_interval - 0.5)`
//! seconds; the time spent in the cycle itself is not subtracted, so the
//! effective period drifts slightly above the nominal one.

use chrono::Local;
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::alerts::{AlertPolicy, Beeper, PeakLog, SilentBeeper, SystemBeeper};
use super::history::MetricsHistory;
use super::processes::{self, ProcessEntry};
use super::sensors::{Diagnostics, DiagnosticsReport, SensorSet};
use super::snapshot::{Metric, NetworkIdentity, Snapshot};
use crate::core::config::{clamp_refresh_interval, EngineConfig};
use crate::error::{Result, SysPulseError};

/// Shortest pause between two cycles
const MIN_SLEEP_SECS: f64 = 0.1;
/// Subtracted from the refresh interval to get the pause between cycles
const SLEEP_OFFSET_SECS: f64 = 0.5;
/// Minimum time between two log lines about failing cycles
const ERROR_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Pause between cycles for a given refresh interval
pub fn sleep_duration_for(refresh_interval: f64) -> Duration {
    Duration::from_secs_f64((refresh_interval - SLEEP_OFFSET_SECS).max(MIN_SLEEP_SECS))
}

struct Shared {
    running: AtomicBool,
    /// `f64` seconds stored as raw bits
    refresh_interval: AtomicU64,
    sleep_lock: Mutex<()>,
    wake: Condvar,
    diagnostics: Arc<Diagnostics>,
}

/// Thread-safe control surface handed to presentation code.
///
/// Every operation may be called from any thread while a cycle is running;
/// changes take effect at the next loop checkpoint.
#[derive(Clone)]
pub struct EngineControl {
    shared: Arc<Shared>,
}

impl EngineControl {
    fn new(refresh_interval: f64, diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                refresh_interval: AtomicU64::new(
                    clamp_refresh_interval(refresh_interval).to_bits(),
                ),
                sleep_lock: Mutex::new(()),
                wake: Condvar::new(),
                diagnostics,
            }),
        }
    }

    /// Sets the refresh interval, returning the clamped value actually used.
    ///
    /// A sleep already in progress keeps its original length.
    pub fn set_refresh_interval(&self, seconds: f64) -> f64 {
        let effective = clamp_refresh_interval(seconds);
        self.shared
            .refresh_interval
            .store(effective.to_bits(), Ordering::SeqCst);
        log::debug!("Refresh interval set to {:.2}s", effective);
        effective
    }

    pub fn refresh_interval(&self) -> f64 {
        f64::from_bits(self.shared.refresh_interval.load(Ordering::SeqCst))
    }

    pub fn sleep_duration(&self) -> Duration {
        sleep_duration_for(self.refresh_interval())
    }

    /// Requests a cooperative stop. The cycle in flight, if any, completes
    /// and publishes; no cycle starts afterwards. Idempotent.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
        let _guard = self.shared.sleep_lock.lock();
        self.shared.wake.notify_all();
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Terminates a process. `false` on access denied or unknown pid.
    pub fn kill_process(&self, pid: u32) -> bool {
        processes::kill_process(pid)
    }

    pub fn top_processes(&self, limit: usize) -> Vec<ProcessEntry> {
        processes::top_processes(limit)
    }

    pub fn diagnostics(&self) -> DiagnosticsReport {
        self.shared.diagnostics.report()
    }

    fn mark_running(&self) {
        self.shared.running.store(true, Ordering::SeqCst);
    }

    /// Sleeps for `duration` unless a stop request arrives first
    fn wait(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        let mut guard = self.shared.sleep_lock.lock();
        while self.is_running() {
            if self.shared.wake.wait_until(&mut guard, deadline).timed_out() {
                break;
            }
        }
    }
}

/// State owned exclusively by the sampling thread
struct Sampler {
    sensors: SensorSet,
    history: MetricsHistory,
    alerts: AlertPolicy,
    identity: Option<NetworkIdentity>,
    cycle: u64,
}

impl Sampler {
    fn ensure_identity(&mut self) -> NetworkIdentity {
        if let Some(identity) = &self.identity {
            return identity.clone();
        }

        let identity = self.sensors.resolve_identity();
        log::info!(
            "Network identity: local {} / public {}",
            identity.local_address,
            identity.public_address
        );
        self.identity = Some(identity.clone());
        identity
    }

    fn run_cycle(&mut self) -> Result<Snapshot> {
        let network = self.ensure_identity();
        let readings = self.sensors.poll()?;
        let ram_percent = readings.memory.percent();

        self.history.append(Metric::Cpu, readings.cpu_percent);
        self.history.append(Metric::Ram, ram_percent);

        let timestamp = Local::now();
        self.alerts
            .process(readings.cpu_percent, ram_percent, timestamp);

        let snapshot = Snapshot {
            timestamp,
            cycle: self.cycle,
            cpu_percent: readings.cpu_percent,
            cpu_temp_celsius: readings.cpu_temp_celsius,
            ram_percent,
            ram_used_bytes: readings.memory.used_bytes,
            ram_total_bytes: readings.memory.total_bytes,
            gpu: readings.gpu,
            battery_percent: readings.battery_percent,
            disks: readings.disks,
            network,
            latency_ms: readings.latency_ms,
            history: self.history.to_series(),
        };

        self.cycle += 1;
        Ok(snapshot)
    }
}

/// Logs failing cycles without flooding: the first failure immediately,
/// then at most one summary line per interval.
struct CycleErrorLog {
    suppressed: u32,
    last_log: Option<Instant>,
}

impl CycleErrorLog {
    fn new() -> Self {
        Self {
            suppressed: 0,
            last_log: None,
        }
    }

    fn report(&mut self, message: &str) {
        let due = self
            .last_log
            .map_or(true, |at| at.elapsed() >= ERROR_LOG_INTERVAL);

        if !due {
            self.suppressed += 1;
            return;
        }

        if self.suppressed > 0 {
            log::warn!(
                "Sampling cycle failed (repeated {} times since last report): {}",
                self.suppressed + 1,
                message
            );
        } else {
            log::warn!("Sampling cycle failed: {}", message);
        }
        self.last_log = Some(Instant::now());
        self.suppressed = 0;
    }

    /// Logs failures still held back from the last window. Returns how many
    /// were pending.
    fn flush(&mut self) -> u32 {
        let pending = self.suppressed;
        if pending > 0 {
            log::warn!(
                "Sampling cycle failed {} more times since last report",
                pending
            );
        }
        self.suppressed = 0;
        pending
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Orchestrates sensors, history and alerts on a fixed cadence
pub struct SamplingEngine {
    control: EngineControl,
    sampler: Sampler,
}

impl SamplingEngine {
    pub fn new(config: &EngineConfig, sensors: SensorSet, alerts: AlertPolicy) -> Self {
        let control = EngineControl::new(config.refresh_interval, sensors.diagnostics());

        Self {
            control,
            sampler: Sampler {
                sensors,
                history: MetricsHistory::with_capacity(config.history_capacity),
                alerts,
                identity: None,
                cycle: 0,
            },
        }
    }

    /// Engine wired to the real operating-system probes
    pub fn with_system_sensors(config: &EngineConfig, alert_sound: bool) -> Self {
        let beeper: Box<dyn Beeper> = if alert_sound {
            Box::new(SystemBeeper)
        } else {
            Box::new(SilentBeeper)
        };
        let alerts = AlertPolicy::new(
            config.thresholds,
            PeakLog::new(config.peak_log_dir.clone()),
            beeper,
        );

        Self::new(config, SensorSet::system(config), alerts)
    }

    pub fn control(&self) -> EngineControl {
        self.control.clone()
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.sampler.history
    }

    pub fn gpu_name(&self) -> Option<String> {
        self.sampler.sensors.gpu_name()
    }

    /// Reads every sensor once without recording history, raising alerts or
    /// publishing. Gives rate-based readings such as CPU load a baseline.
    pub fn prime(&mut self) -> Result<()> {
        self.sampler.sensors.poll().map(|_| ())
    }

    /// Runs exactly one cycle on the calling thread
    pub fn sample_once(&mut self) -> Result<Arc<Snapshot>> {
        match self.sampler.run_cycle() {
            Ok(snapshot) => {
                self.control.shared.diagnostics.record_published();
                Ok(Arc::new(snapshot))
            }
            Err(e) => {
                self.control.shared.diagnostics.record_cycle_failure();
                Err(e)
            }
        }
    }

    /// Starts the cadence loop on a dedicated thread.
    ///
    /// `callback` receives every snapshot, strictly one at a time, on the
    /// sampling thread. A slow callback delays the next cycle.
    pub fn start<F>(self, callback: F) -> Result<EngineHandle>
    where
        F: FnMut(Arc<Snapshot>) + Send + 'static,
    {
        let control = self.control.clone();
        control.mark_running();

        let worker_control = control.clone();
        let sampler = self.sampler;
        let worker = thread::Builder::new()
            .name("syspulse-sampler".to_string())
            .spawn(move || run_loop(sampler, worker_control, callback))
            .map_err(|e| {
                control.stop();
                SysPulseError::engine(format!("failed to spawn sampling thread: {}", e))
            })?;

        Ok(EngineHandle {
            control,
            worker: Some(worker),
        })
    }
}

fn run_loop<F>(mut sampler: Sampler, control: EngineControl, mut callback: F)
where
    F: FnMut(Arc<Snapshot>),
{
    log::info!(
        "Sampling engine started (refresh interval {:.2}s)",
        control.refresh_interval()
    );

    let diagnostics = control.shared.diagnostics.clone();
    let mut errors = CycleErrorLog::new();

    while control.is_running() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<()> {
            let snapshot = Arc::new(sampler.run_cycle()?);
            callback(snapshot);
            Ok(())
        }));

        match outcome {
            Ok(Ok(())) => {
                diagnostics.record_published();
                errors.flush();
            }
            Ok(Err(e)) => {
                diagnostics.record_cycle_failure();
                errors.report(&e.to_string());
            }
            Err(payload) => {
                diagnostics.record_cycle_failure();
                errors.report(&panic_message(payload.as_ref()));
            }
        }

        control.wait(control.sleep_duration());
    }

    errors.flush();
    sampler.sensors.shutdown();
    log::info!(
        "Sampling engine stopped after {} cycles",
        diagnostics.cycles_published()
    );
}

/// Running engine. Dropping it requests a stop without waiting.
pub struct EngineHandle {
    control: EngineControl,
    worker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn control(&self) -> EngineControl {
        self.control.clone()
    }

    /// Stops the loop and waits for the sampling thread to release its
    /// hardware handles
    pub fn stop(mut self) -> Result<()> {
        self.control.stop();
        self.join()
    }

    /// Waits until some other party stops the loop
    pub fn wait(mut self) -> Result<()> {
        self.join()
    }

    fn join(&mut self) -> Result<()> {
        if let Some(worker) = self.worker.take() {
            worker
                .join()
                .map_err(|_| SysPulseError::engine("sampling thread panicked"))?;
        }
        Ok(())
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.control.stop();
        }
    }
}
