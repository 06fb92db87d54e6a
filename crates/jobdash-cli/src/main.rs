//! Jobdash CLI - job-listing dashboards over CSV files and spreadsheets.

mod cli;
mod commands;
mod server;
mod web;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Install the log subscriber; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Serve {
            source,
            preset,
            title,
            port,
            no_open,
            refresh,
        } => commands::serve::run(source, preset, title, port, no_open, refresh),

        Commands::Summary {
            source,
            filters,
            preset,
            json,
        } => commands::summary::run(source, filters, preset, json, cli.verbose),

        Commands::Export {
            source,
            filters,
            preset,
            output,
        } => commands::export::run(source, filters, preset, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
