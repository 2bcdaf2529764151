// UI and formatting module

pub mod formatters;
pub mod prompts;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_gb, format_identity, format_latency, format_size};
pub use prompts::{confirm, dimmed, error, info, success, warn};
