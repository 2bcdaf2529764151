//! Static host description: OS, processor, memory, graphics and adapters.
//!
//! Collected once on demand, unlike the periodic readings of `system_monitor`.

use std::net::IpAddr;

use chrono::{DateTime, Local};
use serde::Serialize;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, Networks, RefreshKind, System};

use crate::platform::get_gpu_provider;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub os: OsInfo,
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    /// `None` when no supported GPU library could be initialized
    pub gpu_name: Option<String>,
    pub network_adapters: Vec<NetworkAdapter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OsInfo {
    pub name: String,
    pub release: String,
    pub build: String,
    pub architecture: String,
    pub node_name: String,
    pub boot_time: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CpuInfo {
    pub processor: String,
    pub physical_cores: Option<usize>,
    /// Logical processors
    pub threads: usize,
    pub max_frequency_mhz: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub swap_total_bytes: u64,
}

/// One IPv4 address bound to an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkAdapter {
    pub name: String,
    pub ipv4: String,
}

/// Gathers the full host description.
///
/// Initializes and releases the GPU library once to read the device name.
pub fn collect_system_info() -> SystemInfo {
    let system = System::new_with_specifics(
        RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_frequency())
            .with_memory(MemoryRefreshKind::everything()),
    );

    SystemInfo {
        os: collect_os(),
        cpu: collect_cpu(&system),
        memory: MemoryInfo {
            total_bytes: system.total_memory(),
            available_bytes: system.available_memory(),
            swap_total_bytes: system.total_swap(),
        },
        gpu_name: detect_gpu_name(),
        network_adapters: collect_adapters(),
    }
}

fn collect_os() -> OsInfo {
    OsInfo {
        name: System::name().unwrap_or_else(|| UNKNOWN.to_string()),
        release: System::os_version().unwrap_or_else(|| UNKNOWN.to_string()),
        build: System::kernel_version()
            .or_else(System::long_os_version)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        architecture: std::env::consts::ARCH.to_string(),
        node_name: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
        boot_time: boot_time_from_epoch(System::boot_time()),
    }
}

/// Converts seconds since the epoch to local time; 0 means unknown
pub fn boot_time_from_epoch(seconds: u64) -> Option<DateTime<Local>> {
    if seconds == 0 {
        return None;
    }
    let seconds = i64::try_from(seconds).ok()?;
    DateTime::from_timestamp(seconds, 0).map(|time| time.with_timezone(&Local))
}

fn collect_cpu(system: &System) -> CpuInfo {
    let cpus = system.cpus();
    let processor = cpus
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    CpuInfo {
        processor,
        physical_cores: System::physical_core_count(),
        threads: cpus.len(),
        max_frequency_mhz: cpus
            .iter()
            .map(|cpu| cpu.frequency())
            .max()
            .filter(|&mhz| mhz > 0),
    }
}

fn detect_gpu_name() -> Option<String> {
    match get_gpu_provider() {
        Ok(mut provider) => {
            let name = provider.name();
            if let Err(e) = provider.shutdown() {
                log::debug!("GPU shutdown failed: {}", e);
            }
            Some(name)
        }
        Err(e) => {
            log::debug!("No GPU for system info: {}", e);
            None
        }
    }
}

fn collect_adapters() -> Vec<NetworkAdapter> {
    let networks = Networks::new_with_refreshed_list();
    ipv4_adapters(networks.list().iter().flat_map(|(name, data)| {
        data.ip_networks()
            .iter()
            .map(move |network| (name.as_str(), network.addr))
    }))
}

/// Keeps IPv4 addresses only, ordered by interface name
pub fn ipv4_adapters<'a, I>(addresses: I) -> Vec<NetworkAdapter>
where
    I: IntoIterator<Item = (&'a str, IpAddr)>,
{
    let mut adapters: Vec<NetworkAdapter> = addresses
        .into_iter()
        .filter_map(|(name, addr)| match addr {
            IpAddr::V4(v4) => Some(NetworkAdapter {
                name: name.to_string(),
                ipv4: v4.to_string(),
            }),
            IpAddr::V6(_) => None,
        })
        .collect();
    adapters.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.ipv4.cmp(&b.ipv4)));
    adapters
}
