//! Data sources a dashboard can load from and write edits back to.

mod file;
mod sheet;

pub use file::{write_csv, write_table, FileBackend};
pub use sheet::SheetBackend;

use crate::edit::EditSink;
use crate::error::Result;
use crate::input::{RawTable, SourceMetadata};

/// Something a raw table can be read from.
pub trait DataSource {
    /// Human-readable location for messages and logs.
    fn describe(&self) -> String;

    /// Read the raw header and rows.
    fn read(&self) -> Result<(RawTable, SourceMetadata)>;
}

/// A readable source that also accepts edits.
pub trait Backend: DataSource + EditSink + Send {}

impl<T: DataSource + EditSink + Send> Backend for T {}
