//! Zenith CLI - Main entry point

use clap::Parser;
use std::process;
use zenith_cli::{commands::run_cli, commands::Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
