//! Data loader: raw source rows to a typed, normalized job table.

use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::Result;
use crate::input::{RawTable, SourceMetadata};
use crate::schema::{ColumnKind, ColumnSchema, JobTable, Value, FAVORITE};

/// A user-facing message shown as a transient banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Result of a load that never fails.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: JobTable,
    /// Present when the source was read successfully.
    pub metadata: Option<SourceMetadata>,
    /// Present when loading failed and the table is empty.
    pub notice: Option<Notice>,
}

/// Loads the job table from a backend fixed at construction.
pub struct Loader {
    backend: Box<dyn Backend>,
}

impl Loader {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn from_boxed(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Read and normalize, propagating any failure.
    pub fn try_load(&self) -> Result<(JobTable, SourceMetadata)> {
        let (raw, metadata) = self.backend.read()?;
        let table = normalize(&raw);
        debug!(
            source = %self.backend.describe(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded source"
        );
        Ok((table, metadata))
    }

    /// Read and normalize; any failure becomes an error notice and an empty table.
    pub fn load(&self) -> Loaded {
        match self.try_load() {
            Ok((table, metadata)) => Loaded {
                table,
                metadata: Some(metadata),
                notice: None,
            },
            Err(e) => {
                warn!(source = %self.backend.describe(), error = %e, "failed to load source");
                Loaded {
                    table: JobTable::empty(),
                    metadata: None,
                    notice: Some(Notice::error(format!("Error loading file: {}", e))),
                }
            }
        }
    }
}

/// Type the raw table and move or insert the favorite flag as the first column.
///
/// A raw table without headers normalizes to an empty table.
pub fn normalize(raw: &RawTable) -> JobTable {
    if raw.column_count() == 0 {
        return JobTable::empty();
    }

    let favorite_at = raw.column_index(FAVORITE);
    let order: Vec<Option<usize>> = std::iter::once(favorite_at)
        .chain(
            (0..raw.column_count())
                .filter(|&i| Some(i) != favorite_at)
                .map(Some),
        )
        .collect();

    let columns = order
        .iter()
        .map(|slot| match slot {
            Some(i) => {
                let name = &raw.headers[*i];
                ColumnSchema::new(name.clone(), ColumnKind::for_column(name))
            }
            None => ColumnSchema::new(FAVORITE, ColumnKind::Boolean),
        })
        .collect();

    let mut table = JobTable::new(columns);
    for raw_row in &raw.rows {
        let cells = order
            .iter()
            .zip(&table.columns)
            .map(|(slot, column)| match slot {
                Some(i) => Value::parse(column.kind, raw_row.get(*i).map_or("", |s| s.as_str())),
                None => Value::Bool(false),
            })
            .collect();
        table.push_row(cells);
    }
    table
}
