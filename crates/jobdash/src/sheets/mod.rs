//! Spreadsheet API access for sheet-backed dashboards.
//!
//! The dashboard only needs two calls: fetch every cell of a worksheet, and
//! write a batch of single-cell values. [`SheetsApi`] is the seam between the
//! backend and the transport, so tests can swap in [`MockSheets`].
//!
//! # Example
//!
//! ```no_run
//! use jobdash::sheets::{SheetCredentials, SheetsApi, SheetsClient};
//!
//! let credentials = SheetCredentials::load("credentials.json").unwrap();
//! let client = SheetsClient::new(credentials).unwrap();
//! let grid = client.fetch_values("1AbC...", "Jobs").unwrap();
//! println!("{} rows", grid.len());
//! ```

mod client;
mod mock;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use client::{SheetCredentials, SheetsClient};
pub use mock::MockSheets;

/// One single-cell write, addressed in A1 notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    /// Range such as `Jobs!A5`.
    pub range: String,
    pub value: String,
}

/// Read/write access to a spreadsheet's cell values.
pub trait SheetsApi: Send + Sync {
    /// Fetch every cell of a worksheet as formatted strings, header row first.
    fn fetch_values(&self, sheet_id: &str, worksheet: &str) -> Result<Vec<Vec<String>>>;

    /// Write all updates in a single request.
    fn batch_update(&self, sheet_id: &str, updates: &[CellUpdate]) -> Result<()>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Spreadsheet row holding the record at a zero-based in-memory position.
///
/// Sheet rows are 1-based and row 1 is the header.
pub fn sheet_row(position: usize) -> usize {
    position + 2
}

/// A1 column letters for a zero-based column index (0 → `A`, 26 → `AA`).
pub fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// `{worksheet}!{column}{row}` for a zero-based column and 1-based row.
pub fn a1_cell(worksheet: &str, column: usize, row: usize) -> String {
    format!("{}!{}{}", quote_worksheet(worksheet), column_letters(column), row)
}

/// Parse `Sheet!B12` into a zero-based column and 1-based row.
pub fn parse_a1_cell(range: &str) -> Option<(usize, usize)> {
    let cell = range.rsplit('!').next()?;
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    let column = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A') as usize + 1)
        - 1;
    let row = digits.parse().ok()?;
    Some((column, row))
}

/// Worksheet names with spaces or punctuation must be single-quoted in A1 ranges.
fn quote_worksheet(worksheet: &str) -> String {
    if worksheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        worksheet.to_string()
    } else {
        format!("'{}'", worksheet.replace('\'', "''"))
    }
}
