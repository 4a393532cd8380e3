use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("skypull")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("skypull")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("pull")
                .about(
                    "Pull profiles and follow edges for every member of the seed lists and \
                starter packs, then export node/edge datasets.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("A single list or starter-pack URL to pull")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("seeds-file"),
                )
                .arg(
                    arg!(-s --"seeds-file" <PATH>)
                        .required(false)
                        .help(
                            "Path to a newline-delimited file of seed URLs. Lines not \
                        starting with https are ignored.",
                        )
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory for the exported datasets")
                        .default_value("."),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Dataset format: csv or json")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(
                    arg!(-c --"concurrency" <NUM_SEEDS>)
                        .required(false)
                        .help("How many seed profiles to expand at once")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"page-limit" <PAGES>)
                        .required(false)
                        .help("Per-endpoint pagination safeguard. 0 disables it.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1000"),
                )
                .arg(
                    arg!(--"dedup")
                        .required(false)
                        .help("Collapse duplicate (source, target) edge rows before export")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("resolve")
                .about("Print the at:// URI for a list or starter-pack URL without pulling")
                .arg(
                    arg!([URL])
                        .required(true)
                        .help("The public bsky.app URL to resolve"),
                ),
        )
}
