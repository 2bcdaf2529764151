use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    #[default]
    Unknown,
}

/// Trait for GPU metrics providers
///
/// A provider wraps an already-initialized vendor management library handle.
/// Initialization happens once, in the platform layer; each read here is
/// independently fallible.
pub trait GpuProvider: Send {
    /// Get the vendor of the GPU
    fn vendor(&self) -> GpuVendor;

    /// Device name, read once at initialization
    fn name(&self) -> String;

    fn utilization_percent(&mut self) -> Result<f32>;

    fn temperature_celsius(&mut self) -> Result<f32>;

    fn vram_percent(&mut self) -> Result<f32>;

    /// Releases the library handle. Must tolerate repeated calls.
    fn shutdown(&mut self) -> Result<()>;
}
