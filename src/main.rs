//! Main entry point for passu.

use clap::Parser;
use passu::cli::Cli;
use passu::utils::error_exit;
use tracing::Level;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if cli.no_color || !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose);

    if let Err(e) = cli.execute() {
        error_exit(&format!("{e:#}"), 1);
    }
}
