use std::fs;
use std::path::PathBuf;

use syspulse::core::config::{EngineConfig, Settings, DEFAULT_LATENCY_STRIDE};
use syspulse::core::system_monitor::DEFAULT_HISTORY_CAPACITY;
use tempfile::TempDir;

#[test]
fn test_engine_config_defaults() {
    let config = EngineConfig::default();

    assert_eq!(config.refresh_interval, 1.0);
    assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    assert_eq!(config.latency_stride, DEFAULT_LATENCY_STRIDE);
    assert_eq!(config.thresholds.cpu, 92.0);
    assert_eq!(config.thresholds.ram, 92.0);
}

#[test]
fn test_settings_file_uses_snake_case_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut settings = Settings {
        refresh_rate: 2.5,
        ..Default::default()
    };
    settings.save_to(&path).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["refresh_rate"], 2.5);
    assert_eq!(json["first_run"], false);
    assert_eq!(json["cpu_alert_threshold"], 92.0);
}

#[test]
fn test_settings_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("syspulse").join("config.json");

    let mut settings = Settings {
        refresh_rate: 0.5,
        cpu_alert_threshold: 85.0,
        ram_alert_threshold: 90.0,
        peak_log_dir: Some(PathBuf::from("/var/log/syspulse")),
        alert_sound: false,
        first_run: true,
    };
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path);
    assert_eq!(loaded, settings);
    assert!(!loaded.first_run);
}

#[test]
fn test_settings_map_to_engine_config() {
    let settings = Settings {
        refresh_rate: 5000.0,
        cpu_alert_threshold: 70.0,
        ram_alert_threshold: 80.0,
        peak_log_dir: Some(PathBuf::from("logs")),
        ..Default::default()
    };

    let config = settings.engine_config();
    assert_eq!(config.refresh_interval, 3600.0);
    assert_eq!(config.thresholds.cpu, 70.0);
    assert_eq!(config.thresholds.ram, 80.0);
    assert_eq!(config.peak_log_dir, PathBuf::from("logs"));
}

#[test]
fn test_empty_settings_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "   \n").unwrap();

    assert_eq!(Settings::load_from(&path), Settings::default());
}
