use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::system_monitor::{find_process, kill_process, ProcessRisk};
use crate::ui::prompts;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let pid = *matches
        .get_one::<u32>("pid")
        .context("PID argument is required")?;
    let skip_confirmation = matches.get_flag("yes");

    let Some(target) = find_process(pid) else {
        prompts::error(&format!("No process with PID {}", pid));
        return Ok(());
    };

    if target.risk == ProcessRisk::System && !skip_confirmation {
        prompts::warn(&format!(
            "{} (PID {}) belongs to a system account",
            target.name, pid
        ));
        if !prompts::confirm("Terminate it anyway? [y/N]")? {
            prompts::dimmed("Cancelled.");
            return Ok(());
        }
    }

    if kill_process(pid) {
        prompts::success(&format!("PID {} terminated", pid));
    } else {
        prompts::error("Critical System Process - Access Denied");
    }

    Ok(())
}
