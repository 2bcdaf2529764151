use anyhow::Result;
use clap::ArgMatches;

use crate::core::system_monitor::top_processes;
use crate::ui::formatters::print_process_table;

/// Default length of the process list
pub const DEFAULT_PROCESS_LIMIT: usize = 20;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let limit = matches
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(DEFAULT_PROCESS_LIMIT);

    let processes = top_processes(limit);

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&processes)?);
    } else {
        print_process_table(&processes);
    }

    Ok(())
}
