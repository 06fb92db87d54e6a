//! CLI command implementations.

pub mod export;
pub mod serve;
pub mod summary;

use jobdash::{JobTable, Loader, SourceMetadata};

use crate::cli::SourceArgs;

/// Load the table for a one-shot command, failing on any source error.
pub(crate) fn load_table(
    source: &SourceArgs,
) -> Result<(JobTable, SourceMetadata), Box<dyn std::error::Error>> {
    let loader = Loader::from_boxed(source.backend()?);
    Ok(loader.try_load()?)
}
