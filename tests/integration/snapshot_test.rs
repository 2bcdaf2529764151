use syspulse::core::system_monitor::{Reading, Snapshot};
use syspulse::ui::formatters::{format_identity, format_latency};
use tempfile::TempDir;

use super::support::{host_engine, ScriptedHost};

#[test]
fn test_snapshot_json_marks_unavailable_readings() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _) = host_engine(ScriptedHost::constant(12.0), dir.path(), 1.0);
    let snapshot = engine.sample_once().unwrap();

    let json = serde_json::to_value(&*snapshot).unwrap();

    assert_eq!(json["cpu_percent"], 12.0);
    assert_eq!(json["latency_ms"]["status"], "unavailable");
    assert_eq!(json["cpu_temp_celsius"]["status"], "unavailable");
    assert!(json["gpu"].is_null());
    assert_eq!(json["network"]["public_address"], "Unknown");
}

#[test]
fn test_snapshot_json_roundtrip_preserves_readings() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _) = host_engine(ScriptedHost::constant(12.0), dir.path(), 1.0);
    let snapshot = engine.sample_once().unwrap();

    let json = serde_json::to_string(&*snapshot).unwrap();
    let parsed: Snapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.cycle, snapshot.cycle);
    assert_eq!(parsed.latency_ms, Reading::Unavailable);
    assert_eq!(parsed.disks, snapshot.disks);
    assert_eq!(parsed.history, snapshot.history);
}

#[test]
fn test_placeholder_snapshot_formats() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _) = host_engine(ScriptedHost::constant(12.0), dir.path(), 1.0);
    let snapshot = engine.sample_once().unwrap();

    assert_eq!(format_identity(&snapshot.network), "L: 127.0.0.1 | P: Unknown");
    assert_eq!(format_latency(&snapshot.latency_ms), "N/A");
}
