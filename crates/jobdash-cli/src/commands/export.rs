//! Export command - write a filtered view to a delimited file.

use std::path::PathBuf;

use colored::Colorize;
use jobdash::backend::write_table;
use jobdash::FilterEngine;

use super::load_table;
use crate::cli::{FilterArgs, Preset, SourceArgs};

pub fn run(
    source: SourceArgs,
    filters: FilterArgs,
    preset: Preset,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let (table, metadata) = load_table(&source)?;

    let options = filters.options(preset.config().filters);
    let outcome = FilterEngine::new(options).apply(&table, &filters.criteria()?);

    let delimiter = match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };
    write_table(&output, &outcome.view, delimiter)?;

    println!(
        "{} {} of {} rows from {} to {}",
        "Exported".green().bold(),
        outcome.view.row_count().to_string().white().bold(),
        table.row_count(),
        metadata.location,
        output.display()
    );

    Ok(())
}
