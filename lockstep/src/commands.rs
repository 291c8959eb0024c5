use clap::{arg, command};
use lockstep_core::tree::MAX_SCALE;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("lockstep")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("lockstep")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log crawl and walk activity at debug level").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl from one or more seed URLs, fetching each page at most once within \
                the depth budget.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The seed URL (default: https://golang.org/)")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("seeds-file"),
                )
                .arg(
                    arg!(-S --"seeds-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of seed URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum crawl depth; 0 fetches nothing")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(
                    arg!(--"fixture" <PATH>)
                        .required(false)
                        .help("JSON fixture of canned pages (default: bundled golang.org fixture)")
                        .conflicts_with("http"),
                )
                .arg(
                    arg!(--"http")
                        .required(false)
                        .help("Fetch pages over HTTP instead of from a fixture")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("fixture"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("HTTP request timeout in seconds, at least 1")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"claim-after-depth")
                        .required(false)
                        .help(
                            "Check the depth budget before claiming a URL, so an exhausted \
                        visit does not block a later one with budget left",
                        )
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("same-tree")
                .about(
                    "Build two shuffled search trees holding k, 2k, ..., 10k and compare them \
                by walking both concurrently.",
                )
                .arg(
                    arg!(-l --"left" <K>)
                        .required(false)
                        .help("k for the left tree")
                        .value_parser(clap::value_parser!(i64).range(-MAX_SCALE..=MAX_SCALE))
                        .allow_negative_numbers(true)
                        .default_value("1"),
                )
                .arg(
                    arg!(-r --"right" <K>)
                        .required(false)
                        .help("k for the right tree")
                        .value_parser(clap::value_parser!(i64).range(-MAX_SCALE..=MAX_SCALE))
                        .allow_negative_numbers(true)
                        .default_value("1"),
                )
                .arg(
                    arg!(-s --"seed" <SEED>)
                        .required(false)
                        .help("Shuffle seed; the right tree uses seed + 1")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("0"),
                ),
        )
}
