// Platform-specific code module

pub mod gpu;
pub mod sound;
pub mod thermal;

pub use gpu::get_gpu_provider;
pub use thermal::ThermalZone;
