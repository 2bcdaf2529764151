//! Static host information, printed once.

use anyhow::Result;
use clap::ArgMatches;

use crate::core::system_info::collect_system_info;
use crate::ui::formatters::print_system_info;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let info = collect_system_info();

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_system_info(&info);
    }

    Ok(())
}
