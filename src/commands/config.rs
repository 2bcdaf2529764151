use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::config::{clamp_refresh_interval, Settings};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut settings = Settings::load()?;
    let mut changed = false;

    if let Some(refresh) = matches.get_one::<f64>("refresh") {
        let effective = clamp_refresh_interval(*refresh);
        if effective != *refresh {
            println!(
                "{}",
                format!("Refresh interval clamped to {:.1}s", effective).yellow()
            );
        }
        settings.refresh_rate = effective;
        changed = true;
    }

    if let Some(threshold) = matches.get_one::<f32>("cpu-threshold") {
        settings.cpu_alert_threshold = *threshold;
        changed = true;
    }

    if let Some(threshold) = matches.get_one::<f32>("ram-threshold") {
        settings.ram_alert_threshold = *threshold;
        changed = true;
    }

    if let Some(dir) = matches.get_one::<String>("log-dir") {
        settings.peak_log_dir = Some(PathBuf::from(dir));
        changed = true;
    }

    if let Some(sound) = matches.get_one::<bool>("sound") {
        settings.alert_sound = *sound;
        changed = true;
    }

    if changed {
        settings.validate()?;
        let path = settings.save().context("Failed to save settings")?;
        println!("{} {}", "Settings saved to".green(), path.display());
    }

    print_settings(&settings);
    Ok(())
}


fn print_settings(settings: &Settings) {
    let log_dir = settings
        .peak_log_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "current directory".to_string());

    println!("{}", "Current settings:".white().bold());
    println!("  {:<16} {:.1}s", "Refresh rate:", settings.refresh_rate);
    println!("  {:<16} {:.0}%", "CPU threshold:", settings.cpu_alert_threshold);
    println!("  {:<16} {:.0}%", "RAM threshold:", settings.ram_alert_threshold);
    println!("  {:<16} {}", "Peak log dir:", log_dir.cyan());
    println!(
        "  {:<16} {}",
        "Alert sound:",
        if settings.alert_sound { "on" } else { "off" }
    );
}
