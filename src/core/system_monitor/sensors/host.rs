//! Operating-system probes: CPU load, memory, CPU temperature, disks, battery.

use serde::{Deserialize, Serialize};
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

use crate::core::system_monitor::snapshot::DiskEntry;
use crate::error::{Result, SysPulseError};
use crate::platform::thermal::ThermalZone;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl MemoryUsage {
    pub fn percent(&self) -> f32 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.used_bytes as f32 / self.total_bytes as f32) * 100.0
    }
}

/// Raw volume facts as reported by the operating system
#[derive(Debug, Clone)]
pub struct VolumeInfo {
    pub device_name: String,
    pub mount_point: String,
    pub is_removable: bool,
    pub is_read_only: bool,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Keeps fixed or writable volumes whose capacity can be read
pub fn select_disks<I>(volumes: I) -> Vec<DiskEntry>
where
    I: IntoIterator<Item = VolumeInfo>,
{
    volumes
        .into_iter()
        .filter(|volume| !volume.is_removable || !volume.is_read_only)
        .filter(|volume| volume.total_bytes > 0)
        .map(|volume| {
            let used = volume.total_bytes.saturating_sub(volume.available_bytes);
            DiskEntry {
                used_percent: (used as f32 / volume.total_bytes as f32) * 100.0,
                device_name: volume.device_name,
                mount_point: volume.mount_point,
                total_bytes: volume.total_bytes,
            }
        })
        .collect()
}

/// Host-level probes. Each call is independent and must return promptly.
pub trait HostProbe: Send {
    fn cpu_percent(&mut self) -> Result<f32>;

    fn memory(&mut self) -> Result<MemoryUsage>;

    /// Returns [`SysPulseError::SensorUnavailable`] when the host exposes no
    /// CPU thermal sensor.
    fn cpu_temperature(&mut self) -> Result<f32>;

    /// Fixed or writable volumes. Volumes whose usage cannot be read are
    /// left out.
    fn disks(&mut self) -> Result<Vec<DiskEntry>>;

    /// `Ok(None)` when the host has no battery.
    fn battery_percent(&mut self) -> Result<Option<f32>>;
}

/// [`HostProbe`] backed by `sysinfo`, the platform thermal zone and `battery`
pub struct SysinfoHostProbe {
    system: System,
    disks: Disks,
    thermal: Option<ThermalZone>,
}

impl SysinfoHostProbe {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::nothing().with_ram());

        let thermal = match ThermalZone::open() {
            Ok(zone) => Some(zone),
            Err(e) => {
                log::info!("CPU temperature unavailable: {}", e);
                None
            }
        };

        Self {
            system: System::new_with_specifics(refresh_kind),
            disks: Disks::new_with_refreshed_list(),
            thermal,
        }
    }
}

impl Default for SysinfoHostProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SysinfoHostProbe {
    fn cpu_percent(&mut self) -> Result<f32> {
        self.system.refresh_cpu_usage();
        let usage = self.system.global_cpu_usage();

        if !usage.is_finite() {
            return Err(SysPulseError::metric_collection("CPU usage is not a number"));
        }
        Ok(usage.clamp(0.0, 100.0))
    }

    fn memory(&mut self) -> Result<MemoryUsage> {
        self.system.refresh_memory();
        let total_bytes = self.system.total_memory();

        if total_bytes == 0 {
            return Err(SysPulseError::metric_collection("total memory reported as zero"));
        }

        Ok(MemoryUsage {
            used_bytes: self.system.used_memory(),
            total_bytes,
        })
    }

    fn cpu_temperature(&mut self) -> Result<f32> {
        match self.thermal.as_mut() {
            Some(zone) => zone.read_celsius(),
            None => Err(SysPulseError::sensor_unavailable("no CPU thermal zone")),
        }
    }

    fn disks(&mut self) -> Result<Vec<DiskEntry>> {
        self.disks.refresh(true);

        Ok(select_disks(self.disks.iter().map(|disk| VolumeInfo {
            device_name: disk.name().to_string_lossy().to_string(),
            mount_point: disk.mount_point().to_string_lossy().to_string(),
            is_removable: disk.is_removable(),
            is_read_only: disk.is_read_only(),
            total_bytes: disk.total_space(),
            available_bytes: disk.available_space(),
        })))
    }

    fn battery_percent(&mut self) -> Result<Option<f32>> {
        use battery::units::ratio::percent;

        let manager = battery::Manager::new()
            .map_err(|e| SysPulseError::sensor_unavailable(format!("battery API: {}", e)))?;
        let mut batteries = manager
            .batteries()
            .map_err(|e| SysPulseError::metric_collection(format!("battery enumeration: {}", e)))?;

        match batteries.next() {
            Some(Ok(battery)) => Ok(Some(battery.state_of_charge().get::<percent>())),
            Some(Err(e)) => Err(SysPulseError::metric_collection(format!(
                "battery read: {}",
                e
            ))),
            None => Ok(None),
        }
    }
}
