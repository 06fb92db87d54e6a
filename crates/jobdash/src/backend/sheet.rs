//! Spreadsheet backend.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use super::DataSource;
use crate::edit::{EditDelta, EditSink, WriteReport};
use crate::error::Result;
use crate::input::{RawTable, SourceMetadata};
use crate::schema::{JobTable, FAVORITE};
use crate::sheets::{a1_cell, sheet_row, CellUpdate, SheetsApi};

/// A worksheet in a remote spreadsheet.
///
/// Only favorite flags are persisted, one cell per changed row in the
/// worksheet's own `Favorite` column as seen by the last read.
pub struct SheetBackend {
    sheet_id: String,
    worksheet: String,
    api: Arc<dyn SheetsApi>,
    favorite_column: Mutex<Option<usize>>,
}

impl SheetBackend {
    pub fn new(
        sheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        api: Arc<dyn SheetsApi>,
    ) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            worksheet: worksheet.into(),
            api,
            favorite_column: Mutex::new(None),
        }
    }

    /// Position of `Favorite` in the worksheet, if the last read found one.
    pub fn favorite_column(&self) -> Option<usize> {
        self.favorite_column.lock().map(|c| *c).unwrap_or(None)
    }

    /// Cell updates for every changed favorite, in row order.
    pub fn favorite_updates(&self, column: usize, delta: &EditDelta) -> Vec<CellUpdate> {
        delta
            .favorite_changes()
            .into_iter()
            .map(|(row, favorite)| CellUpdate {
                range: a1_cell(&self.worksheet, column, sheet_row(row)),
                value: if favorite { "TRUE" } else { "FALSE" }.to_string(),
            })
            .collect()
    }
}

impl DataSource for SheetBackend {
    fn describe(&self) -> String {
        format!("sheet {} / {}", self.sheet_id, self.worksheet)
    }

    fn read(&self) -> Result<(RawTable, SourceMetadata)> {
        let grid = self.api.fetch_values(&self.sheet_id, &self.worksheet)?;
        let contents = serde_json::to_vec(&grid)?;
        let table = RawTable::from_grid(grid);
        if let Ok(mut column) = self.favorite_column.lock() {
            *column = table.column_index(FAVORITE);
        }
        let metadata = SourceMetadata::new(self.describe(), &contents, "sheet", "utf-8", &table);
        Ok((table, metadata))
    }
}

impl EditSink for SheetBackend {
    fn write_back(&self, _canonical: &JobTable, delta: &EditDelta) -> Result<WriteReport> {
        if delta.favorite_changes().is_empty() {
            return Ok(WriteReport::Skipped);
        }

        let Some(column) = self.favorite_column() else {
            warn!(sheet = %self.sheet_id, worksheet = %self.worksheet, "no Favorite column to write to");
            return Ok(WriteReport::Unsaved {
                reason: format!(
                    "Favorites were not saved: worksheet '{}' has no {} column",
                    self.worksheet, FAVORITE
                ),
            });
        };

        let updates = self.favorite_updates(column, delta);
        self.api.batch_update(&self.sheet_id, &updates)?;
        info!(
            sheet = %self.sheet_id,
            api = self.api.name(),
            cells = updates.len(),
            "updated favorites"
        );

        Ok(WriteReport::Updated {
            cells: updates.len(),
        })
    }
}
