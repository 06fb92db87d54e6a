//! Local delimited file backend.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::DataSource;
use crate::edit::{EditDelta, EditSink, WriteReport};
use crate::error::{DashError, Result};
use crate::input::{Parser, ParserConfig, RawTable, SourceMetadata};
use crate::schema::JobTable;

/// A CSV/TSV file on disk.
///
/// Any edit rewrites the whole file from the canonical table.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    parser: Parser,
}

impl FileBackend {
    /// Read `path` with UTF-8, falling back to windows-1252.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, ParserConfig::default())
    }

    pub fn with_config(path: impl Into<PathBuf>, config: ParserConfig) -> Self {
        Self {
            path: path.into(),
            parser: Parser::with_config(config),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delimiter used when rewriting: the configured one, else by extension.
    fn write_delimiter(&self) -> u8 {
        if let Some(d) = self.parser.config().delimiter {
            return d;
        }
        match self.path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        }
    }
}

impl DataSource for FileBackend {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<(RawTable, SourceMetadata)> {
        self.parser.parse_file(&self.path)
    }
}

impl EditSink for FileBackend {
    fn write_back(&self, canonical: &JobTable, delta: &EditDelta) -> Result<WriteReport> {
        if delta.is_empty() {
            return Ok(WriteReport::Skipped);
        }

        write_table(&self.path, canonical, self.write_delimiter())?;
        info!(
            path = %self.path.display(),
            rows = canonical.row_count(),
            changed = delta.len(),
            "rewrote source file"
        );

        Ok(WriteReport::Rewrote {
            location: self.describe(),
            rows: canonical.row_count(),
        })
    }
}

/// Write a table to a file, UTF-8, header row first, dates as `YYYY-MM-DD`.
pub fn write_table(path: impl AsRef<Path>, table: &JobTable, delimiter: u8) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                DashError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(|e| {
        DashError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
    })?;

    write_csv(BufWriter::new(file), table, delimiter)
        .map_err(|e| DashError::Persistence(format!("Failed to write '{}': {}", path.display(), e)))
}

/// Write a table as delimited text to any writer.
pub fn write_csv<W: Write>(writer: W, table: &JobTable, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        writer.write_record(row.cells.iter().map(|v| v.to_cell_string()))?;
    }
    writer.flush().map_err(|e| DashError::Persistence(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnKind, ColumnSchema, Value};
    use tempfile::TempDir;

    fn table() -> JobTable {
        let mut table = JobTable::new(vec![
            ColumnSchema::new("Favorite", ColumnKind::Boolean),
            ColumnSchema::new("Job Title", ColumnKind::Text),
        ]);
        table.push_row(vec![Value::Bool(true), Value::Text("Roof, east".into())]);
        table.push_row(vec![Value::Bool(false), Value::Null]);
        table
    }

    #[test]
    fn test_write_csv_quotes_and_blanks() {
        let mut out = Vec::new();
        write_csv(&mut out, &table(), b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Favorite,Job Title\nTrue,\"Roof, east\"\nFalse,\n");
    }

    #[test]
    fn test_empty_delta_does_not_touch_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");
        let backend = FileBackend::new(&path);

        let report = backend.write_back(&table(), &EditDelta::default()).unwrap();
        assert_eq!(report, WriteReport::Skipped);
        assert!(!path.exists());
    }

    #[test]
    fn test_write_delimiter_by_extension() {
        assert_eq!(FileBackend::new("jobs.tsv").write_delimiter(), b'\t');
        assert_eq!(FileBackend::new("jobs.csv").write_delimiter(), b',');
        let config = ParserConfig::default().with_delimiter(b';');
        assert_eq!(FileBackend::with_config("jobs.csv", config).write_delimiter(), b';');
    }

    #[test]
    fn test_write_table_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output").join("jobs.csv");
        write_table(&path, &table(), b',').unwrap();
        assert!(path.exists());
    }
}
