//! Command-line interface definition.

use clap::{value_parser, Arg, ArgAction, Command};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("syspulse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Real-time system health monitor with peak alerts")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("watch")
                .about("Sample continuously and print one line per cycle")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Seconds between cycles (overrides saved refresh rate)")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_name("N")
                        .help("Stop after N snapshots")
                        .value_parser(value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print each snapshot as a JSON document")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-sound")
                        .long("no-sound")
                        .help("Do not beep on peaks")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Print a single system snapshot")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the snapshot as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Show static hardware and OS information")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the information as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("top")
                .about("List the busiest processes")
                .arg(
                    Arg::new("limit")
                        .short('l')
                        .long("limit")
                        .value_name("N")
                        .help("Number of processes to show (default: 20)")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the list as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("kill")
                .about("Terminate a process")
                .arg(
                    Arg::new("pid")
                        .help("Process ID")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip confirmation for system processes")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change saved settings")
                .arg(
                    Arg::new("refresh")
                        .long("refresh")
                        .value_name("SECONDS")
                        .help("Refresh rate in seconds")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("cpu-threshold")
                        .long("cpu-threshold")
                        .value_name("PERCENT")
                        .help("CPU peak threshold")
                        .value_parser(value_parser!(f32)),
                )
                .arg(
                    Arg::new("ram-threshold")
                        .long("ram-threshold")
                        .value_name("PERCENT")
                        .help("RAM peak threshold")
                        .value_parser(value_parser!(f32)),
                )
                .arg(
                    Arg::new("log-dir")
                        .long("log-dir")
                        .value_name("DIR")
                        .help("Directory for daily peak logs"),
                )
                .arg(
                    Arg::new("sound")
                        .long("sound")
                        .value_name("on|off")
                        .help("Beep on peaks")
                        .value_parser(clap::builder::BoolishValueParser::new()),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(Shell)),
                ),
        )
}
