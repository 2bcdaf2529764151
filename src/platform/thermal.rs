//! CPU thermal zone access.
//!
//! Windows exposes the ACPI thermal zone through WMI (`root\WMI`,
//! `MSAcpi_ThermalZoneTemperature`, tenths of Kelvin). Elsewhere the
//! hardware sensors enumerated by `sysinfo` are searched for a CPU package
//! sensor.

use crate::error::{Result, SysPulseError};

#[cfg(windows)]
use serde::Deserialize;
#[cfg(windows)]
use wmi::WMIConnection;

#[cfg(windows)]
#[derive(Deserialize, Debug)]
#[serde(rename = "MSAcpi_ThermalZoneTemperature")]
#[serde(rename_all = "PascalCase")]
struct ThermalZoneTemperature {
    current_temperature: u32,
}

/// Converts a WMI thermal zone reading (tenths of Kelvin) to Celsius
pub fn decikelvin_to_celsius(decikelvin: u32) -> f32 {
    decikelvin as f32 / 10.0 - 273.15
}

/// Labels that identify the CPU package sensor, in order of preference
const CPU_SENSOR_LABELS: [&str; 5] = ["package", "tctl", "tdie", "cpu", "core"];

/// Picks the most CPU-like sensor from `(label, temperature)` pairs
pub fn pick_cpu_temperature<'a, I>(sensors: I) -> Option<f32>
where
    I: IntoIterator<Item = (&'a str, Option<f32>)>,
{
    let readings: Vec<(String, f32)> = sensors
        .into_iter()
        .filter_map(|(label, temp)| {
            temp.filter(|t| t.is_finite() && *t > 0.0)
                .map(|t| (label.to_lowercase(), t))
        })
        .collect();

    CPU_SENSOR_LABELS
        .iter()
        .find_map(|wanted| {
            readings
                .iter()
                .find(|(label, _)| label.contains(wanted))
                .map(|(_, t)| *t)
        })
}

/// Handle to the platform's CPU thermal sensor, opened once at startup
#[cfg(windows)]
pub struct ThermalZone {
    _private: (),
}

#[cfg(windows)]
impl ThermalZone {
    /// Verifies that the WMI thermal zone class answers. The connection is
    /// reopened on each read because COM handles are bound to one thread.
    pub fn open() -> Result<Self> {
        let zone = Self { _private: () };
        zone.query()?;
        Ok(zone)
    }

    pub fn read_celsius(&mut self) -> Result<f32> {
        self.query()
    }

    fn query(&self) -> Result<f32> {
        let wmi_con = WMIConnection::with_namespace_path("root\\WMI")
            .map_err(|e| SysPulseError::sensor_unavailable(format!("WMI connection: {}", e)))?;

        let zones: Vec<ThermalZoneTemperature> = wmi_con
            .query()
            .map_err(|e| SysPulseError::metric_collection(format!("WMI query failed: {}", e)))?;

        zones
            .first()
            .map(|zone| decikelvin_to_celsius(zone.current_temperature))
            .ok_or_else(|| SysPulseError::sensor_unavailable("no ACPI thermal zone"))
    }
}

/// Handle to the platform's CPU thermal sensor, opened once at startup
#[cfg(not(windows))]
pub struct ThermalZone {
    components: sysinfo::Components,
}

#[cfg(not(windows))]
impl ThermalZone {
    pub fn open() -> Result<Self> {
        let mut zone = Self {
            components: sysinfo::Components::new_with_refreshed_list(),
        };
        zone.read_celsius()?;
        Ok(zone)
    }

    pub fn read_celsius(&mut self) -> Result<f32> {
        self.components.refresh(false);

        pick_cpu_temperature(
            self.components
                .iter()
                .map(|component| (component.label(), component.temperature())),
        )
        .ok_or_else(|| SysPulseError::sensor_unavailable("no CPU temperature sensor"))
    }
}
