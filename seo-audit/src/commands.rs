use clap::{arg, command};
use seo_audit_core::config::DEFAULT_CONFIG_PATH;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("seo-audit")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("seo-audit")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and progress output")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("audit")
                .about("Fetch a page and run on-page SEO checks against it")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The page to audit (https:// is assumed when no scheme is given)"),
                )
                .arg(
                    arg!(--"checks" <IDS>)
                        .required(false)
                        .help("Comma-separated check ids to run (default: all, or the config's default_checks)"),
                )
                .arg(
                    arg!(--"skip" <IDS>)
                        .required(false)
                        .help("Comma-separated check ids to leave out"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, html")
                        .value_parser(["text", "json", "csv", "html"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to a file or directory (default: print to stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"relay" <URL>)
                        .required(false)
                        .help("CORS relay endpoint that every request is sent through")
                        .conflicts_with("direct"),
                )
                .arg(
                    arg!(--"direct")
                        .required(false)
                        .help("Fetch pages directly instead of through the relay")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("relay"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    arg!(--"concurrency" <NUM>)
                        .required(false)
                        .help("Maximum simultaneous broken-link probes")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help(format!("Configuration file (default: {})", DEFAULT_CONFIG_PATH))
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-v --"verbose")
                        .required(false)
                        .help("Raise log verbosity (-v info, -vv debug)")
                        .action(clap::ArgAction::Count),
                ),
        )
        .subcommand(command!("checks").about("List every available audit check by category"))
        .subcommand(
            command!("init")
                .about("Writes a default configuration file")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location of the configuration file")
                        .default_value(DEFAULT_CONFIG_PATH),
                )
                .arg(
                    arg!(-f - -"force")
                        .help("Overwrite an existing configuration file")
                        .required(false),
                ),
        )
}
