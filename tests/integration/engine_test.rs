use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use syspulse::core::system_monitor::{
    NetworkIdentity, Reading, SensorKind, SensorSet, DEFAULT_HISTORY_CAPACITY,
};
use syspulse::error::SysPulseError;
use tempfile::TempDir;

use super::support::{engine_with, host_engine, wait_for, CountingLatency, ScriptedHost, TOTAL_RAM};

#[test]
fn test_sample_once_produces_complete_snapshot() {
    let dir = TempDir::new().unwrap();
    let (mut engine, _) = host_engine(ScriptedHost::constant(37.5), dir.path(), 1.0);

    let snapshot = engine.sample_once().unwrap();

    assert_eq!(snapshot.cycle, 0);
    assert_eq!(snapshot.cpu_percent, 37.5);
    assert_eq!(snapshot.ram_percent, 50.0);
    assert_eq!(snapshot.ram_total_bytes, TOTAL_RAM);
    assert_eq!(snapshot.cpu_temp_celsius, Reading::Unavailable);
    assert!(snapshot.gpu.is_none());
    assert_eq!(snapshot.battery_percent, Some(80.0));
    assert_eq!(snapshot.disks.len(), 1);
    assert_eq!(snapshot.network, NetworkIdentity::unknown());
    assert_eq!(snapshot.latency_ms, Reading::Unavailable);
    assert_eq!(snapshot.history.cpu.len(), DEFAULT_HISTORY_CAPACITY);
    assert_eq!(snapshot.history.ram.len(), DEFAULT_HISTORY_CAPACITY);
    assert_eq!(snapshot.history.cpu.last(), Some(&37.5));

    assert_eq!(engine.sample_once().unwrap().cycle, 1);
}

#[test]
fn test_failed_cycle_publishes_nothing() {
    let dir = TempDir::new().unwrap();
    let host = ScriptedHost::with_script(vec![Some(10.0), None, Some(30.0)]);
    let (mut engine, _) = host_engine(host, dir.path(), 1.0);
    let control = engine.control();

    assert!(engine.sample_once().is_ok());
    assert!(matches!(
        engine.sample_once(),
        Err(SysPulseError::MetricCollection(_))
    ));
    let snapshot = engine.sample_once().unwrap();

    // The failed cycle neither advanced the counter nor touched the history
    assert_eq!(snapshot.cycle, 1);
    let tail: Vec<f32> = snapshot.history.cpu.iter().rev().take(2).copied().collect();
    assert_eq!(tail, vec![30.0, 10.0]);

    let report = control.diagnostics();
    assert_eq!(report.cycle_failures, 1);
    assert_eq!(report.cycles_published, 2);
    assert_eq!(report.sensor_failures, vec![(SensorKind::Cpu, 1)]);
}

#[test]
fn test_latency_measured_every_eighth_cycle() {
    let dir = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let sensors = SensorSet::builder(Box::new(ScriptedHost::constant(5.0))).latency_probe(
        Box::new(CountingLatency {
            calls: calls.clone(),
            millis: 23,
        }),
        8,
    );
    let (mut engine, _) = engine_with(sensors, dir.path(), 1.0);

    for _ in 0..17 {
        let snapshot = engine.sample_once().unwrap();
        assert_eq!(snapshot.latency_ms, Reading::Value(23));
    }

    // Cycles 0, 8 and 16
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_gpu_init_attempted_once_for_engine_lifetime() {
    let dir = TempDir::new().unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let sensors = SensorSet::builder(Box::new(ScriptedHost::constant(5.0))).gpu_init(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(SysPulseError::gpu_not_available("no vendor library"))
    });
    let (engine, _) = engine_with(sensors, dir.path(), 0.1);

    let published = Arc::new(AtomicUsize::new(0));
    let seen = published.clone();
    let handle = engine
        .start(move |snapshot| {
            assert!(snapshot.gpu.is_none());
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    assert!(wait_for(Duration::from_secs(5), || published
        .load(Ordering::SeqCst)
        >= 3));
    handle.stop().unwrap();

    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_loop_publishes_until_stopped() {
    let dir = TempDir::new().unwrap();
    let (engine, _) = host_engine(ScriptedHost::constant(20.0), dir.path(), 0.1);

    let published = Arc::new(AtomicUsize::new(0));
    let seen = published.clone();
    let handle = engine
        .start(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    let control = handle.control();
    assert!(control.is_running());

    assert!(wait_for(Duration::from_secs(5), || published
        .load(Ordering::SeqCst)
        >= 2));
    handle.stop().unwrap();

    let after_stop = published.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(300));

    assert!(!control.is_running());
    assert_eq!(published.load(Ordering::SeqCst), after_stop);
    assert_eq!(control.diagnostics().cycles_published, after_stop as u64);
}

#[test]
fn test_stop_lets_in_flight_cycle_finish() {
    let dir = TempDir::new().unwrap();
    let host = ScriptedHost::constant(20.0).delay(Duration::from_millis(300));
    let polls = host.polls();
    let (engine, _) = host_engine(host, dir.path(), 0.1);

    let published = Arc::new(AtomicUsize::new(0));
    let seen = published.clone();
    let handle = engine
        .start(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    assert!(wait_for(Duration::from_secs(5), || polls
        .load(Ordering::SeqCst)
        >= 1));
    handle.stop().unwrap();

    assert_eq!(published.load(Ordering::SeqCst), 1);
    assert_eq!(polls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropping_handle_stops_loop() {
    let dir = TempDir::new().unwrap();
    let (engine, _) = host_engine(ScriptedHost::constant(20.0), dir.path(), 0.1);

    let handle = engine.start(|_| {}).unwrap();
    let control = handle.control();
    drop(handle);

    assert!(!control.is_running());
}

#[test]
fn test_loop_survives_cycle_errors() {
    let dir = TempDir::new().unwrap();
    let (engine, _) = host_engine(ScriptedHost::with_script(vec![None]), dir.path(), 0.1);

    let handle = engine.start(|_| panic!("no snapshot expected")).unwrap();
    let control = handle.control();

    assert!(wait_for(Duration::from_secs(5), || control
        .diagnostics()
        .cycle_failures
        >= 3));
    assert!(control.is_running());
    handle.stop().unwrap();

    assert_eq!(control.diagnostics().cycles_published, 0);
}

#[test]
fn test_loop_survives_panicking_consumer() {
    let dir = TempDir::new().unwrap();
    let (engine, _) = host_engine(ScriptedHost::constant(20.0), dir.path(), 0.1);

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let handle = engine
        .start(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("consumer bug");
            }
        })
        .unwrap();
    let control = handle.control();

    assert!(wait_for(Duration::from_secs(5), || calls
        .load(Ordering::SeqCst)
        >= 3));
    handle.stop().unwrap();

    assert_eq!(control.diagnostics().cycle_failures, 1);
}

#[test]
fn test_refresh_change_waits_for_current_sleep() {
    let dir = TempDir::new().unwrap();
    // 2.0s interval sleeps 1.5s between cycles
    let (engine, _) = host_engine(ScriptedHost::constant(20.0), dir.path(), 2.0);

    let published = Arc::new(AtomicUsize::new(0));
    let seen = published.clone();
    let handle = engine
        .start(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    let control = handle.control();

    assert!(wait_for(Duration::from_secs(2), || published
        .load(Ordering::SeqCst)
        >= 1));
    thread::sleep(Duration::from_millis(200));
    assert_eq!(control.set_refresh_interval(0.1), 0.1);

    thread::sleep(Duration::from_millis(600));
    assert_eq!(published.load(Ordering::SeqCst), 1);

    assert!(wait_for(Duration::from_secs(5), || published
        .load(Ordering::SeqCst)
        >= 4));
    handle.stop().unwrap();
}

#[test]
fn test_peak_cycle_through_engine_logs_and_beeps() {
    let dir = TempDir::new().unwrap();
    let host = ScriptedHost::constant(95.0).ram_used(TOTAL_RAM * 97 / 100);
    let (mut engine, beeps) = host_engine(host, dir.path(), 1.0);

    let snapshot = engine.sample_once().unwrap();

    let log_file = dir.path().join(format!(
        "peak_log_{}.txt",
        snapshot.timestamp.format("%Y%m%d")
    ));
    let content = fs::read_to_string(log_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("PEAK: CPU @ 95.0%"));
    assert!(lines[1].ends_with("PEAK: RAM @ 97.0%"));
    assert_eq!(beeps.load(Ordering::SeqCst), 1);
}

#[cfg(unix)]
#[test]
fn test_control_kills_process() {
    use std::process::Command;

    let dir = TempDir::new().unwrap();
    let (engine, _) = host_engine(ScriptedHost::constant(1.0), dir.path(), 1.0);
    let control = engine.control();

    let mut child = Command::new("sleep").arg("30").spawn().unwrap();
    assert!(control.kill_process(child.id()));

    let status = child.wait().unwrap();
    assert!(!status.success());
}

#[test]
fn test_prime_reads_sensors_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let host = ScriptedHost::constant(95.0);
    let polls = host.polls();
    let (mut engine, beeps) = host_engine(host, dir.path(), 1.0);

    engine.prime().unwrap();

    assert_eq!(polls.load(Ordering::SeqCst), 1);
    assert_eq!(beeps.load(Ordering::SeqCst), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(engine.control().diagnostics().cycles_published, 0);

    let snapshot = engine.sample_once().unwrap();
    let log_file = dir.path().join(format!(
        "peak_log_{}.txt",
        snapshot.timestamp.format("%Y%m%d")
    ));

    assert_eq!(snapshot.cycle, 0);
    assert_eq!(fs::read_to_string(log_file).unwrap().lines().count(), 1);
    assert_eq!(beeps.load(Ordering::SeqCst), 1);
    let recorded: Vec<f32> = snapshot.history.cpu.iter().copied().filter(|v| *v > 0.0).collect();
    assert_eq!(recorded, vec![95.0]);
}
