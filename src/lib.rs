// SysPulse Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, SysPulseError};

// Module declarations
pub mod cli;
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::{EngineConfig, Settings};
pub use core::system_monitor::{EngineControl, EngineHandle, SamplingEngine, Snapshot};

/// Initialize logging. `RUST_LOG` still overrides the chosen level.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
