use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::system_monitor::{AlertThresholds, DEFAULT_HISTORY_CAPACITY};
use crate::error::SysPulseError;

/// Default seconds between cycles
pub const DEFAULT_REFRESH_INTERVAL: f64 = 1.0;
/// Lower bound applied to any refresh interval
pub const MIN_REFRESH_INTERVAL: f64 = 0.1;
/// Upper bound applied to any refresh interval
pub const MAX_REFRESH_INTERVAL: f64 = 3600.0;
/// Latency is re-measured on every Nth cycle
pub const DEFAULT_LATENCY_STRIDE: u64 = 8;
pub const DEFAULT_PUBLIC_IP_URL: &str = "https://api.ipify.org";

/// Clamps a requested refresh interval to the supported range.
///
/// Non-finite input falls back to the default.
pub fn clamp_refresh_interval(seconds: f64) -> f64 {
    if !seconds.is_finite() {
        return DEFAULT_REFRESH_INTERVAL;
    }
    seconds.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL)
}

/// Runtime parameters of the sampling engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub refresh_interval: f64,
    pub history_capacity: usize,
    pub latency_stride: u64,
    pub latency_target: SocketAddr,
    pub latency_timeout: Duration,
    pub public_ip_url: String,
    pub public_ip_timeout: Duration,
    pub thresholds: AlertThresholds,
    pub peak_log_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            latency_stride: DEFAULT_LATENCY_STRIDE,
            latency_target: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 53)),
            latency_timeout: Duration::from_secs(1),
            public_ip_url: DEFAULT_PUBLIC_IP_URL.to_string(),
            public_ip_timeout: Duration::from_secs(2),
            thresholds: AlertThresholds::default(),
            peak_log_dir: PathBuf::from("."),
        }
    }
}

/// User settings persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: f64,
    #[serde(default = "default_threshold")]
    pub cpu_alert_threshold: f32,
    #[serde(default = "default_threshold")]
    pub ram_alert_threshold: f32,
    /// Directory for peak logs (None = current directory)
    #[serde(default)]
    pub peak_log_dir: Option<PathBuf>,
    #[serde(default = "default_alert_sound")]
    pub alert_sound: bool,
    #[serde(default = "default_first_run")]
    pub first_run: bool,
}

fn default_refresh_rate() -> f64 {
    DEFAULT_REFRESH_INTERVAL
}

fn default_threshold() -> f32 {
    92.0
}

fn default_alert_sound() -> bool {
    true
}

fn default_first_run() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_rate: default_refresh_rate(),
            cpu_alert_threshold: default_threshold(),
            ram_alert_threshold: default_threshold(),
            peak_log_dir: None,
            alert_sound: default_alert_sound(),
            first_run: default_first_run(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;
        Ok(Self::load_from(&path))
    }

    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing, empty or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(_) => return Settings::default(),
        };

        if data.trim().is_empty() {
            return Settings::default();
        }

        let settings: Settings = match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings file {:?}: {}", path, e);
                return Settings::default();
            }
        };

        match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("Ignoring invalid settings file {:?}: {}", path, e);
                Settings::default()
            }
        }
    }

    /// Checks values a hand-edited file or the CLI may get wrong
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.refresh_rate.is_finite() || self.refresh_rate <= 0.0 {
            return Err(SysPulseError::config(format!(
                "refresh_rate must be a positive number of seconds, got {}",
                self.refresh_rate
            )));
        }

        for (name, value) in [
            ("cpu_alert_threshold", self.cpu_alert_threshold),
            ("ram_alert_threshold", self.ram_alert_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(SysPulseError::config(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let path = Self::get_config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        self.first_run = false;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, data).with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("syspulse").join("config.json"))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            refresh_interval: clamp_refresh_interval(self.refresh_rate),
            thresholds: AlertThresholds {
                cpu: self.cpu_alert_threshold,
                ram: self.ram_alert_threshold,
            },
            peak_log_dir: self
                .peak_log_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            ..EngineConfig::default()
        }
    }
}
