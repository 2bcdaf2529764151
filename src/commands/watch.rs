//! Continuous monitoring: one line (or JSON document) per snapshot until
//! Ctrl+C or the requested count is reached.

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::config::{clamp_refresh_interval, Settings};
use crate::core::system_monitor::SamplingEngine;
use crate::ui::formatters::format_snapshot_line;
use crate::ui::prompts;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut settings = Settings::load()?;
    if settings.first_run {
        let path = settings.save()?;
        prompts::dimmed(&format!("Settings saved to {}", path.display()));
    }

    let mut config = settings.engine_config();
    if let Some(interval) = matches.get_one::<f64>("interval") {
        config.refresh_interval = clamp_refresh_interval(*interval);
    }

    let count = matches.get_one::<u64>("count").copied();
    let json_output = matches.get_flag("json");
    let alert_sound = settings.alert_sound && !matches.get_flag("no-sound");

    let engine = SamplingEngine::with_system_sensors(&config, alert_sound);
    let control = engine.control();

    if !json_output {
        if let Some(name) = engine.gpu_name() {
            prompts::dimmed(&format!("GPU: {}", name));
        }
        println!(
            "{}",
            format!(
                "Sampling every {:.1}s, peaks logged to {} (Ctrl+C to stop)",
                control.refresh_interval(),
                config.peak_log_dir.display()
            )
            .cyan()
        );
    }

    let ctrlc_control = control.clone();
    ctrlc::set_handler(move || {
        ctrlc_control.stop();
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let thresholds = config.thresholds;
    let limit_control = control.clone();
    let mut shown = 0u64;

    let handle = engine
        .start(move |snapshot| {
            if json_output {
                match serde_json::to_string(&*snapshot) {
                    Ok(line) => println!("{}", line),
                    Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
                }
            } else {
                println!("{}", format_snapshot_line(&snapshot, &thresholds));
            }

            shown += 1;
            if count.is_some_and(|limit| shown >= limit) {
                limit_control.stop();
            }
        })
        .context("Failed to start sampling engine")?;

    handle.wait()?;

    let report = control.diagnostics();
    log::debug!(
        "Published {} snapshots, {} failed cycles, sensor failures: {:?}",
        report.cycles_published,
        report.cycle_failures,
        report.sensor_failures
    );

    Ok(())
}
