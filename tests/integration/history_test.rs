use syspulse::core::system_monitor::{Metric, MetricsHistory, DEFAULT_HISTORY_CAPACITY};
use tempfile::TempDir;

use super::support::{host_engine, ScriptedHost};

#[test]
fn test_history_starts_full_of_zeros() {
    let history = MetricsHistory::new();

    let cpu = history.snapshot_series(Metric::Cpu);
    assert_eq!(cpu.len(), DEFAULT_HISTORY_CAPACITY);
    assert!(cpu.iter().all(|v| *v == 0.0));
}

#[test]
fn test_history_evicts_oldest_at_capacity() {
    let mut history = MetricsHistory::with_capacity(3);
    for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
        history.append(Metric::Ram, value);
    }

    assert_eq!(history.snapshot_series(Metric::Ram), vec![3.0, 4.0, 5.0]);
    assert_eq!(history.snapshot_series(Metric::Cpu), vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_engine_history_is_ordered_oldest_first() {
    let dir = TempDir::new().unwrap();
    let host = ScriptedHost::with_script(vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    let (mut engine, _) = host_engine(host, dir.path(), 1.0);

    let mut last = None;
    for _ in 0..4 {
        last = Some(engine.sample_once().unwrap());
    }
    let snapshot = last.unwrap();

    let cpu = &snapshot.history.cpu;
    assert_eq!(cpu.len(), DEFAULT_HISTORY_CAPACITY);
    assert_eq!(&cpu[cpu.len() - 4..], &[1.0f32, 2.0, 3.0, 4.0]);
    assert!(cpu[..cpu.len() - 4].iter().all(|v| *v == 0.0));
    assert!(snapshot.history.ram.iter().rev().take(4).all(|v| *v == 50.0));

    // Earlier snapshots are unaffected by later cycles
    assert_eq!(engine.history().snapshot_series(Metric::Cpu).last(), Some(&4.0));
}
