pub mod crawl;
pub mod fixture;
pub mod tree;

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{}",
        r#"
  _            _       _
 | | ___   ___| | ____| |_ ___ _ __
 | |/ _ \ / __| |/ / __| __/ _ \ '_ \
 | | (_) | (__|   <\__ \ ||  __/ |_) |
 |_|\___/ \___|_|\_\___/\__\___| .__/
                               |_|
"#
        .bright_cyan()
    );
    println!(
        "  {} {}\n",
        "lockstep".bright_white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
