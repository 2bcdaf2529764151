// Command handlers module
pub mod completions;
pub mod config;
pub mod info;
pub mod kill;
pub mod snapshot;
pub mod top;
pub mod watch;

// Re-exports for cleaner imports
pub use config::execute as config;
pub use info::execute as info;
pub use kill::execute as kill;
pub use snapshot::execute as snapshot;
pub use top::execute as top;
pub use watch::execute as watch;
