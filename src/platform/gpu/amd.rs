use crate::core::system_monitor::{GpuProvider, GpuVendor};
use crate::error::{Result, SysPulseError};

#[cfg(all(unix, feature = "rocm"))]
use rocm_smi_lib::{DeviceHandle, RocmSmi, TemperatureMetric};

/// AMD GPU provider using ROCm SMI
pub struct AmdGpuProvider {
    #[cfg(all(unix, feature = "rocm"))]
    rocm: Option<RocmSmi>,
    #[allow(dead_code)]
    device_index: u32,
    name: String,
}

impl AmdGpuProvider {
    /// Create a new AMD GPU provider
    ///
    /// Initializes ROCm SMI and selects the first available GPU.
    pub fn new() -> Result<Self> {
        Self::with_device_index(0)
    }

    /// Create provider for a specific GPU index
    pub fn with_device_index(index: u32) -> Result<Self> {
        #[cfg(all(unix, feature = "rocm"))]
        {
            let rocm = RocmSmi::init().map_err(|e| {
                SysPulseError::gpu_not_available(format!("Failed to init ROCm SMI: {:?}", e))
            })?;

            let device_count = rocm.get_device_count().map_err(|e| {
                SysPulseError::gpu_not_available(format!("Failed to get device count: {:?}", e))
            })?;

            if index >= device_count as u32 {
                return Err(SysPulseError::gpu_not_available(format!(
                    "GPU {} not found (only {} devices available)",
                    index, device_count
                )));
            }

            let mut provider = Self {
                rocm: Some(rocm),
                device_index: index,
                name: String::new(),
            };
            provider.name = provider
                .with_device(|rocm, device| rocm.get_device_name(device).ok())
                .ok()
                .flatten()
                .unwrap_or_else(|| "Unknown AMD GPU".to_string());

            Ok(provider)
        }
        #[cfg(not(all(unix, feature = "rocm")))]
        {
            let _ = index;
            Err(SysPulseError::gpu_not_available(
                "AMD GPU support not enabled or not on Unix",
            ))
        }
    }

    #[cfg(all(unix, feature = "rocm"))]
    fn with_device<T, F>(&mut self, read: F) -> Result<T>
    where
        F: FnOnce(&mut RocmSmi, &DeviceHandle) -> T,
    {
        let index = self.device_index;
        let rocm = self
            .rocm
            .as_mut()
            .ok_or_else(|| SysPulseError::gpu_not_available("ROCm SMI already shut down"))?;
        let device = rocm.get_device_handle(index).map_err(|e| {
            SysPulseError::metric_collection(format!("Failed to get GPU device: {:?}", e))
        })?;
        Ok(read(rocm, &device))
    }
}

impl GpuProvider for AmdGpuProvider {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Amd
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn utilization_percent(&mut self) -> Result<f32> {
        #[cfg(all(unix, feature = "rocm"))]
        {
            self.with_device(|rocm, device| rocm.get_busy_percent(device))?
                .map(|busy| busy as f32)
                .map_err(|e| SysPulseError::metric_collection(format!("busy percent: {:?}", e)))
        }
        #[cfg(not(all(unix, feature = "rocm")))]
        {
            Err(SysPulseError::gpu_not_available("AMD GPU support not enabled"))
        }
    }

    fn temperature_celsius(&mut self) -> Result<f32> {
        #[cfg(all(unix, feature = "rocm"))]
        {
            self.with_device(|rocm, device| rocm.get_temperature(device, TemperatureMetric::Edge))?
                .map(|t| t as f32)
                .map_err(|e| SysPulseError::metric_collection(format!("temperature: {:?}", e)))
        }
        #[cfg(not(all(unix, feature = "rocm")))]
        {
            Err(SysPulseError::gpu_not_available("AMD GPU support not enabled"))
        }
    }

    fn vram_percent(&mut self) -> Result<f32> {
        #[cfg(all(unix, feature = "rocm"))]
        {
            let (used, total) = self.with_device(|rocm, device| {
                (rocm.get_memory_used(device), rocm.get_memory_total(device))
            })?;
            let used = used.map_err(|e| SysPulseError::metric_collection(format!("VRAM used: {:?}", e)))?;
            let total =
                total.map_err(|e| SysPulseError::metric_collection(format!("VRAM total: {:?}", e)))?;

            if total == 0 {
                return Err(SysPulseError::metric_collection("GPU reports zero VRAM"));
            }
            Ok((used as f32 / total as f32) * 100.0)
        }
        #[cfg(not(all(unix, feature = "rocm")))]
        {
            Err(SysPulseError::gpu_not_available("AMD GPU support not enabled"))
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        #[cfg(all(unix, feature = "rocm"))]
        {
            // Dropping the handle shuts the library down
            self.rocm.take();
        }
        Ok(())
    }
}
