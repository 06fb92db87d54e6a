//! In-memory spreadsheet for testing.

use std::sync::Mutex;

use super::{parse_a1_cell, CellUpdate, SheetsApi};
use crate::error::{DashError, Result};

/// Mock spreadsheet that serves a fixed grid and records batch updates.
///
/// Successful updates are applied to the grid, so a later fetch sees them.
pub struct MockSheets {
    grid: Mutex<Vec<Vec<String>>>,
    batches: Mutex<Vec<Vec<CellUpdate>>>,
    fail_fetch: Option<String>,
    fail_updates: Option<String>,
}

impl MockSheets {
    /// Create a mock serving the given grid (header row first).
    pub fn new(grid: Vec<Vec<String>>) -> Self {
        Self {
            grid: Mutex::new(grid),
            batches: Mutex::new(Vec::new()),
            fail_fetch: None,
            fail_updates: None,
        }
    }

    /// Build a grid from string slices.
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    /// Make every fetch fail with the given message.
    pub fn failing_fetch(mut self, message: impl Into<String>) -> Self {
        self.fail_fetch = Some(message.into());
        self
    }

    /// Make every batch update fail with the given message.
    pub fn failing_updates(mut self, message: impl Into<String>) -> Self {
        self.fail_updates = Some(message.into());
        self
    }

    /// Every batch received so far, in order.
    pub fn batches(&self) -> Vec<Vec<CellUpdate>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Current grid contents.
    pub fn grid(&self) -> Vec<Vec<String>> {
        self.grid.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl Default for MockSheets {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SheetsApi for MockSheets {
    fn fetch_values(&self, _sheet_id: &str, _worksheet: &str) -> Result<Vec<Vec<String>>> {
        if let Some(message) = &self.fail_fetch {
            return Err(DashError::Sheets {
                status: 403,
                message: message.clone(),
            });
        }
        Ok(self.grid())
    }

    fn batch_update(&self, _sheet_id: &str, updates: &[CellUpdate]) -> Result<()> {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push(updates.to_vec());
        }

        if let Some(message) = &self.fail_updates {
            return Err(DashError::Sheets {
                status: 500,
                message: message.clone(),
            });
        }

        if let Ok(mut grid) = self.grid.lock() {
            for update in updates {
                let Some((column, row)) = parse_a1_cell(&update.range) else {
                    continue;
                };
                if let Some(cells) = row.checked_sub(1).and_then(|r| grid.get_mut(r)) {
                    if cells.len() <= column {
                        cells.resize(column + 1, String::new());
                    }
                    cells[column] = update.value.clone();
                }
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
