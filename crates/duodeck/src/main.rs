mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod error;
mod input;
mod logging;
mod notes;
mod parser;
mod presenter;
mod render;
mod theme;

use clap::Parser;
use colored::Colorize;

use crate::cli::Cli;
use crate::logging::{Verbosity, init_logging};

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
