//! Grid presentation of a filtered view.

use serde::Serialize;

use crate::schema::{ColumnKind, JobTable, Value, Widget};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub widget: Widget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    /// Canonical row index, sent back with edits.
    pub source_row: usize,
    /// 1-based position in the grid.
    pub display_index: usize,
    pub cells: Vec<Value>,
}

/// The editable (or read-only) grid for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub columns: Vec<GridColumn>,
    pub rows: Vec<GridRow>,
    pub editable: bool,
}

/// Lay out a view as a grid, choosing each column's widget from its type tag.
pub fn present(view: &JobTable, editable: bool) -> Grid {
    let columns = view
        .columns
        .iter()
        .map(|c| GridColumn {
            name: c.name.clone(),
            kind: c.kind,
            widget: c.kind.widget(),
        })
        .collect();

    let rows = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| GridRow {
            source_row: r.source_row,
            display_index: i + 1,
            cells: r.cells.clone(),
        })
        .collect();

    Grid {
        columns,
        rows,
        editable,
    }
}
