#[cfg(feature = "nvml")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, Device, Nvml};

use crate::core::system_monitor::{GpuProvider, GpuVendor};
use crate::error::{Result, SysPulseError};

/// NVIDIA GPU provider using NVML
pub struct NvidiaGpuProvider {
    #[cfg(feature = "nvml")]
    nvml: Option<Nvml>,
    device_index: u32,
    name: String,
}

impl NvidiaGpuProvider {
    /// Create a new NVIDIA GPU provider
    ///
    /// Initializes NVML and selects the first available GPU.
    pub fn new() -> Result<Self> {
        Self::with_device_index(0)
    }

    /// Create provider for a specific GPU index
    pub fn with_device_index(index: u32) -> Result<Self> {
        #[cfg(feature = "nvml")]
        {
            let nvml = Nvml::init()
                .map_err(|e| SysPulseError::gpu_not_available(format!("Failed to init NVML: {}", e)))?;

            let name = {
                let device = nvml.device_by_index(index).map_err(|e| {
                    SysPulseError::gpu_not_available(format!("GPU {} not found: {}", index, e))
                })?;
                device
                    .name()
                    .unwrap_or_else(|_| "Unknown NVIDIA GPU".to_string())
            };

            Ok(Self {
                nvml: Some(nvml),
                device_index: index,
                name,
            })
        }
        #[cfg(not(feature = "nvml"))]
        {
            let _ = index;
            Err(SysPulseError::gpu_not_available(
                "NVIDIA GPU support not enabled",
            ))
        }
    }

    #[cfg(feature = "nvml")]
    fn get_device(&self) -> Result<Device<'_>> {
        let nvml = self
            .nvml
            .as_ref()
            .ok_or_else(|| SysPulseError::gpu_not_available("NVML already shut down"))?;

        nvml.device_by_index(self.device_index)
            .map_err(|e| SysPulseError::metric_collection(format!("Failed to get GPU device: {}", e)))
    }
}

impl GpuProvider for NvidiaGpuProvider {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Nvidia
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn utilization_percent(&mut self) -> Result<f32> {
        #[cfg(feature = "nvml")]
        {
            let rates = self.get_device()?.utilization_rates().map_err(|e| {
                SysPulseError::metric_collection(format!("Failed to get utilization: {}", e))
            })?;
            Ok(rates.gpu as f32)
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(SysPulseError::gpu_not_available("NVIDIA GPU support not enabled"))
        }
    }

    fn temperature_celsius(&mut self) -> Result<f32> {
        #[cfg(feature = "nvml")]
        {
            let temperature = self
                .get_device()?
                .temperature(TemperatureSensor::Gpu)
                .map_err(|e| {
                    SysPulseError::metric_collection(format!("Failed to get temperature: {}", e))
                })?;
            Ok(temperature as f32)
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(SysPulseError::gpu_not_available("NVIDIA GPU support not enabled"))
        }
    }

    fn vram_percent(&mut self) -> Result<f32> {
        #[cfg(feature = "nvml")]
        {
            let memory_info = self.get_device()?.memory_info().map_err(|e| {
                SysPulseError::metric_collection(format!("Failed to get memory info: {}", e))
            })?;

            if memory_info.total == 0 {
                return Err(SysPulseError::metric_collection("GPU reports zero VRAM"));
            }
            Ok((memory_info.used as f32 / memory_info.total as f32) * 100.0)
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(SysPulseError::gpu_not_available("NVIDIA GPU support not enabled"))
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        #[cfg(feature = "nvml")]
        {
            if let Some(nvml) = self.nvml.take() {
                nvml.shutdown().map_err(|e| {
                    SysPulseError::other(format!("NVML shutdown failed: {}", e))
                })?;
            }
        }
        Ok(())
    }
}
