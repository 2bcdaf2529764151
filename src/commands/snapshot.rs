//! Single snapshot, printed once.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::Settings;
use crate::core::system_monitor::SamplingEngine;
use crate::ui::formatters::print_snapshot;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let settings = Settings::load()?;
    let config = settings.engine_config();
    let mut engine = SamplingEngine::with_system_sensors(&config, false);

    // The first CPU reading has no baseline to diff against
    if let Err(e) = engine.prime() {
        log::debug!("Priming read failed: {}", e);
    }
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    let snapshot = engine
        .sample_once()
        .context("Failed to collect system snapshot")?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    Ok(())
}
