//! Summary command - print the metrics of a filtered view.

use colored::Colorize;
use jobdash::{handle_interaction, NoticeLevel, SessionState};

use super::load_table;
use crate::cli::{FilterArgs, Preset, SourceArgs};

pub fn run(
    source: SourceArgs,
    filters: FilterArgs,
    preset: Preset,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (table, metadata) = load_table(&source)?;

    let mut config = preset.config();
    config.filters = filters.options(config.filters);
    let session = SessionState {
        criteria: filters.criteria()?,
        renders: 0,
    };

    let (_, view) = handle_interaction(&config, &session, &table);

    if json_output {
        let summary = serde_json::json!({
            "source": metadata.location,
            "hash": metadata.hash,
            "total_rows": view.total_rows,
            "metrics": view.metrics,
            "notices": view.notices,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Summary for".cyan().bold(),
        metadata.location.white()
    );
    if verbose {
        println!(
            "  {} rows, {} columns, {} ({})",
            metadata.row_count, metadata.column_count, metadata.format, metadata.encoding
        );
        println!("  Hash: {}", metadata.hash);
    }
    println!();

    for notice in &view.notices {
        let label = match notice.level {
            NoticeLevel::Success => "Success:".green(),
            NoticeLevel::Warning => "Warning:".yellow(),
            NoticeLevel::Error => "Error:".red(),
        };
        println!("{} {}", label, notice.message);
    }

    if let Some(metrics) = &view.metrics {
        for card in &metrics.cards {
            println!("  {:<24} {}", format!("{}:", card.label), card.value.white().bold());
        }
        println!();
        println!(
            "Showing {} of {} rows",
            metrics.metrics.count.to_string().white().bold(),
            view.total_rows
        );
    }

    Ok(())
}
