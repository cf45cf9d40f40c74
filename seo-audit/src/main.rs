use colored::Colorize;
use seo_audit::commands::command_argument_builder;
use seo_audit::handlers::{handle_audit, handle_checks, handle_init};
use seo_audit_core::print_banner;

fn report_error(error: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), error);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        None => {}
        Some(("audit", primary_command)) => match handle_audit(primary_command).await {
            Ok(code) => std::process::exit(code),
            Err(e) => report_error(e),
        },
        Some(("checks", _)) => handle_checks(),
        Some(("init", primary_command)) => {
            if let Err(e) = handle_init(primary_command) {
                report_error(e);
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
