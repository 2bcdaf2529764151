//! Process listing and termination for the control surface.
//!
//! These run on the caller's thread, never inside the sampling loop.

use serde::{Deserialize, Serialize};
use sysinfo::{
    Pid, Process, ProcessRefreshKind, ProcessesToUpdate, Signal, System, UpdateKind, Users,
};

/// Accounts whose processes are considered part of the operating system
const SERVICE_ACCOUNTS: [&str; 4] = ["SYSTEM", "LOCAL SERVICE", "NETWORK SERVICE", "ROOT"];

/// CPU share above which a user process is flagged as a kill candidate
const HIGH_LOAD_PERCENT: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessRisk {
    /// Owned by a service account or an unknown user; killing it may destabilize the host
    System,
    /// User process with heavy CPU use
    HighLoad,
    Safe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
    pub status: String,
    pub user: Option<String>,
    pub risk: ProcessRisk,
}

pub fn classify_process(user: Option<&str>, cpu_percent: f32) -> ProcessRisk {
    let is_system = match user {
        None => true,
        Some(name) => {
            let upper = name.to_uppercase();
            upper.is_empty() || SERVICE_ACCOUNTS.iter().any(|account| upper.contains(account))
        }
    };

    if is_system {
        ProcessRisk::System
    } else if cpu_percent > HIGH_LOAD_PERCENT {
        ProcessRisk::HighLoad
    } else {
        ProcessRisk::Safe
    }
}

/// Sorts by CPU usage, highest first, and keeps `limit` entries
pub fn rank_processes(mut processes: Vec<ProcessEntry>, limit: usize) -> Vec<ProcessEntry> {
    processes.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    processes.truncate(limit);
    processes
}

fn process_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_cpu()
        .with_memory()
        .with_user(UpdateKind::OnlyIfNotSet)
}

/// Refreshes `targets` twice, one CPU measurement interval apart, so usage
/// figures are meaningful
fn measured_system(targets: ProcessesToUpdate<'_>) -> System {
    let mut system = System::new();
    system.refresh_processes_specifics(targets, true, process_refresh_kind());
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_processes_specifics(targets, true, process_refresh_kind());
    system
}

fn to_entry(process: &Process, users: &Users) -> ProcessEntry {
    let user = process
        .user_id()
        .and_then(|uid| users.get_user_by_id(uid))
        .map(|user| user.name().to_string());
    let cpu_percent = process.cpu_usage();

    ProcessEntry {
        pid: process.pid().as_u32(),
        name: process.name().to_string_lossy().to_string(),
        cpu_percent,
        memory_bytes: process.memory(),
        status: process.status().to_string(),
        risk: classify_process(user.as_deref(), cpu_percent),
        user,
    }
}

/// Lists the `limit` busiest processes.
///
/// Blocks for one CPU measurement interval.
pub fn top_processes(limit: usize) -> Vec<ProcessEntry> {
    let system = measured_system(ProcessesToUpdate::All);
    let users = Users::new_with_refreshed_list();

    let entries = system
        .processes()
        .values()
        .map(|process| to_entry(process, &users))
        .collect();

    rank_processes(entries, limit)
}

/// Looks up a single process. Blocks for one CPU measurement interval.
pub fn find_process(pid: u32) -> Option<ProcessEntry> {
    let pid = Pid::from_u32(pid);
    let pids = [pid];
    let system = measured_system(ProcessesToUpdate::Some(&pids));
    let users = Users::new_with_refreshed_list();

    system.process(pid).map(|process| to_entry(process, &users))
}

/// Asks a process to terminate (SIGTERM where signals exist).
///
/// Returns `false` if the process does not exist or the request is refused.
pub fn kill_process(pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing(),
    );

    match system.process(pid) {
        Some(process) => {
            let sent = process
                .kill_with(Signal::Term)
                .unwrap_or_else(|| process.kill());
            if !sent {
                log::warn!("Termination of PID {} was refused", pid);
            }
            sent
        }
        None => false,
    }
}
