//! Deepfry CLI
//!
//! Command-line entry point for the audio degrader.

use clap::Parser;
use env_logger::Env;
use log::info;

use deepfry::cli::{commands, Cli};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Deepfry v{}", env!("CARGO_PKG_VERSION"));

    std::process::exit(commands::run(&cli));
}
