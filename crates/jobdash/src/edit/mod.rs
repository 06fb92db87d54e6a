//! Edit detection and write-back.

mod delta;

pub use delta::{edited_copy, CellChange, EditDelta, EditedRow};

use serde::Serialize;

use crate::error::Result;
use crate::schema::JobTable;

/// What a write-back did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteReport {
    /// The whole backing file was rewritten.
    Rewrote { location: String, rows: usize },
    /// Single cells were updated remotely.
    Updated { cells: usize },
    /// Nothing this backend persists was changed.
    Skipped,
    /// Changes this backend would persist had nowhere to go.
    Unsaved { reason: String },
}

/// Persists edits back to the source a table was loaded from.
pub trait EditSink {
    /// Persist `delta`. `canonical` already contains the edited values.
    fn write_back(&self, canonical: &JobTable, delta: &EditDelta) -> Result<WriteReport>;
}
