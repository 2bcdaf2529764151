use chrono::{Local, TimeZone};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use syspulse::core::system_monitor::{
    evaluate_alerts, AlertPolicy, AlertThresholds, Metric, PeakLog,
};
use tempfile::TempDir;

use super::support::CountingBeeper;

fn policy(dir: &std::path::Path) -> (AlertPolicy, Arc<AtomicUsize>) {
    let beeps = Arc::new(AtomicUsize::new(0));
    let policy = AlertPolicy::new(
        AlertThresholds::default(),
        PeakLog::new(dir),
        Box::new(CountingBeeper {
            beeps: beeps.clone(),
        }),
    );
    (policy, beeps)
}

#[test]
fn test_threshold_is_strict() {
    let at = Local::now();
    let thresholds = AlertThresholds::default();

    assert!(evaluate_alerts(92.0, 92.0, &thresholds, at).is_empty());

    let events = evaluate_alerts(92.1, 10.0, &thresholds, at);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].metric, Metric::Cpu);
}

#[test]
fn test_quiet_cycle_has_no_side_effects() {
    let dir = TempDir::new().unwrap();
    let (policy, beeps) = policy(dir.path());

    assert!(policy.process(40.0, 60.0, Local::now()).is_empty());

    assert_eq!(beeps.load(Ordering::SeqCst), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_log_line_format() {
    let dir = TempDir::new().unwrap();
    let (policy, _) = policy(dir.path());
    let at = Local.with_ymd_and_hms(2024, 5, 14, 9, 3, 7).unwrap();

    policy.process(95.0, 10.0, at);

    let content = fs::read_to_string(dir.path().join("peak_log_20240514.txt")).unwrap();
    assert_eq!(content, "[09:03:07] PEAK: CPU @ 95.0%\n");
}

#[test]
fn test_log_appends_across_cycles() {
    let dir = TempDir::new().unwrap();
    let (policy, beeps) = policy(dir.path());
    let at = Local.with_ymd_and_hms(2024, 5, 14, 12, 0, 0).unwrap();

    policy.process(95.0, 10.0, at);
    policy.process(10.0, 99.0, at);
    policy.process(96.0, 10.0, at);

    let content = fs::read_to_string(dir.path().join("peak_log_20240514.txt")).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert_eq!(beeps.load(Ordering::SeqCst), 3);
}

#[test]
fn test_log_file_rolls_over_by_day() {
    let dir = TempDir::new().unwrap();
    let (policy, _) = policy(dir.path());

    policy.process(95.0, 10.0, Local.with_ymd_and_hms(2024, 5, 14, 23, 59, 59).unwrap());
    policy.process(95.0, 10.0, Local.with_ymd_and_hms(2024, 5, 15, 0, 0, 1).unwrap());

    assert!(dir.path().join("peak_log_20240514.txt").exists());
    assert!(dir.path().join("peak_log_20240515.txt").exists());
}

#[test]
fn test_unwritable_log_still_beeps() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "file").unwrap();
    let (policy, beeps) = policy(&blocker);

    let events = policy.process(95.0, 95.0, Local::now());

    assert_eq!(events.len(), 2);
    assert_eq!(beeps.load(Ordering::SeqCst), 1);
}
