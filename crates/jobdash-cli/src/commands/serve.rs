//! Serve command - run the dashboard web UI.

use colored::Colorize;
use jobdash::{Dashboard, Loader};

use crate::cli::{Preset, SourceArgs};
use crate::server::{app, state::AppState};

pub fn run(
    source: SourceArgs,
    preset: Preset,
    title: Option<String>,
    port: u16,
    no_open: bool,
    refresh: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    // Built before the runtime starts; sheet clients block.
    let backend = source.backend()?;
    let location = backend.describe();

    let mut config = preset.config().with_refresh_secs(refresh);
    if let Some(title) = title {
        config = config.with_title(title);
    }

    let dashboard = Dashboard::new(config, Loader::from_boxed(backend));
    let state = AppState::new(dashboard);

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting dashboard at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Source: {}", location);
    println!("  Preset: {}", preset);
    println!("  Refresh: every {}s", refresh);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            std::process::exit(0);
        });

        app::run_server(state, port).await
    })?;

    Ok(())
}
