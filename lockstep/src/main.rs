use colored::Colorize;
use lockstep::commands::command_argument_builder;
use lockstep::handlers::{handle_crawl, handle_same_tree, init_tracing, wants_banner};
use lockstep_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(chosen_command.get_flag("verbose"));

    if wants_banner(&chosen_command) {
        print_banner();
    }

    let exit_code = match chosen_command.subcommand() {
        // No subcommand provided, just show the banner
        None => 0,
        Some(("crawl", primary_command)) => match handle_crawl(primary_command, quiet).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                1
            }
        },
        Some(("same-tree", primary_command)) => {
            match handle_same_tree(primary_command, quiet).await {
                Ok(true) => 0,
                Ok(false) => 1,
                Err(e) => {
                    eprintln!("{} {:#}", "✗".red().bold(), e);
                    2
                }
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    };

    std::process::exit(exit_code);
}
