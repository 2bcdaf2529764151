//! Peak alerts for sustained high load.
//!
//! Evaluates CPU and RAM readings against fixed thresholds and dispatches the
//! side effects of a crossing: an audible beep and a line in the daily peak log.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::snapshot::Metric;
use crate::error::Result;
use crate::platform::sound;

/// Critical thresholds (%). A reading strictly above its threshold is a peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub cpu: f32,
    pub ram: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            cpu: 92.0,
            ram: 92.0,
        }
    }
}

impl AlertThresholds {
    pub fn for_metric(&self, metric: Metric) -> f32 {
        match metric {
            Metric::Cpu => self.cpu,
            Metric::Ram => self.ram,
        }
    }
}

/// A threshold crossing observed in one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub metric: Metric,
    pub value: f32,
    pub timestamp: DateTime<Local>,
}

impl AlertEvent {
    /// `[HH:MM:SS] PEAK: <metric> @ <value>%`
    pub fn log_line(&self) -> String {
        format!(
            "[{}] PEAK: {} @ {:.1}%",
            self.timestamp.format("%H:%M:%S"),
            self.metric.label(),
            self.value
        )
    }
}

/// Evaluate this cycle's CPU and RAM values. No hysteresis: a metric that
/// stays above its threshold produces an event every cycle.
pub fn evaluate_alerts(
    cpu: f32,
    ram: f32,
    thresholds: &AlertThresholds,
    at: DateTime<Local>,
) -> Vec<AlertEvent> {
    [(Metric::Cpu, cpu), (Metric::Ram, ram)]
        .into_iter()
        .filter(|(metric, value)| *value > thresholds.for_metric(*metric))
        .map(|(metric, value)| AlertEvent {
            metric,
            value,
            timestamp: at,
        })
        .collect()
}

/// Audible alert facility
pub trait Beeper: Send {
    fn beep(&self) -> Result<()>;
}

/// Beeps through the platform sound facility
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBeeper;

impl Beeper for SystemBeeper {
    fn beep(&self) -> Result<()> {
        sound::beep(1000, 200)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBeeper;

impl Beeper for SilentBeeper {
    fn beep(&self) -> Result<()> {
        Ok(())
    }
}

/// Append-only daily log of peak events (`peak_log_YYYYMMDD.txt`)
#[derive(Debug, Clone)]
pub struct PeakLog {
    dir: PathBuf,
}

impl PeakLog {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("peak_log_{}.txt", date.format("%Y%m%d")))
    }

    /// Appends one line per event to the file of the event's calendar day
    pub fn append(&self, events: &[AlertEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir)?;

        for event in events {
            let path = self.path_for(event.timestamp.date_naive());
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            writeln!(file, "{}", event.log_line())?;
        }

        Ok(())
    }
}

/// Threshold evaluator plus side-effect dispatcher
pub struct AlertPolicy {
    thresholds: AlertThresholds,
    peak_log: PeakLog,
    beeper: Box<dyn Beeper>,
}

impl AlertPolicy {
    pub fn new(thresholds: AlertThresholds, peak_log: PeakLog, beeper: Box<dyn Beeper>) -> Self {
        Self {
            thresholds,
            peak_log,
            beeper,
        }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    pub fn peak_log(&self) -> &PeakLog {
        &self.peak_log
    }

    pub fn evaluate(&self, cpu: f32, ram: f32, at: DateTime<Local>) -> Vec<AlertEvent> {
        evaluate_alerts(cpu, ram, &self.thresholds, at)
    }

    /// Beeps once for the cycle and logs every event. Side-effect failures
    /// are logged and swallowed.
    pub fn dispatch(&self, events: &[AlertEvent]) {
        if events.is_empty() {
            return;
        }

        if let Err(e) = self.beeper.beep() {
            log::warn!("Audible alert failed: {}", e);
        }

        if let Err(e) = self.peak_log.append(events) {
            log::warn!(
                "Failed to write peak log in {:?}: {}",
                self.peak_log.dir(),
                e
            );
        }
    }

    /// Evaluate and dispatch in one step, returning the events raised
    pub fn process(&self, cpu: f32, ram: f32, at: DateTime<Local>) -> Vec<AlertEvent> {
        let events = self.evaluate(cpu, ram, at);
        self.dispatch(&events);
        events
    }
}
