use anyhow::Result;

use syspulse::cli::build_cli;
use syspulse::commands;

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    syspulse::init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("watch", sub_matches)) => commands::watch(sub_matches)?,
        Some(("snapshot", sub_matches)) => commands::snapshot(sub_matches)?,
        Some(("info", sub_matches)) => commands::info(sub_matches)?,
        Some(("top", sub_matches)) => commands::top(sub_matches)?,
        Some(("kill", sub_matches)) => commands::kill(sub_matches)?,
        Some(("config", sub_matches)) => commands::config(sub_matches)?,
        Some(("completions", sub_matches)) => {
            let mut cli = build_cli();
            commands::completions::execute(sub_matches, &mut cli)?;
        }
        _ => {
            println!("Welcome to syspulse!");
            println!("Use 'syspulse --help' for more information.");
        }
    }

    Ok(())
}
