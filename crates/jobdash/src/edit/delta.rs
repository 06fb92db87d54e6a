//! Cell-level difference between a displayed view and its edited copy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{JobTable, Value, FAVORITE};

/// A row as submitted back from the grid.
///
/// Only the columns present in `values` are changed; the rest keep the
/// displayed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditedRow {
    /// Canonical index of the edited row.
    pub source_row: usize,
    /// Column name to submitted value.
    #[serde(default)]
    pub values: IndexMap<String, serde_json::Value>,
}

impl EditedRow {
    pub fn new(source_row: usize) -> Self {
        Self {
            source_row,
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, column: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(column.into(), value);
        self
    }
}

/// Apply submitted rows to a copy of the displayed view.
///
/// Submitted values are coerced to the column's type. Rows that are not in
/// the view and columns that are not in its schema are ignored.
pub fn edited_copy(view: &JobTable, edits: &[EditedRow]) -> JobTable {
    let mut edited = view.clone();
    for edit in edits {
        let Some(position) = edited.position_of(edit.source_row) else {
            continue;
        };
        for (name, json) in &edit.values {
            let Some(col) = edited.column_index(name) else {
                continue;
            };
            let kind = edited.columns[col].kind;
            edited.rows[position].cells[col] = Value::from_json(kind, json);
        }
    }
    edited
}

/// One changed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellChange {
    pub source_row: usize,
    pub column: String,
    pub before: Value,
    pub after: Value,
}

/// Every cell that differs between a view and its edited copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditDelta {
    pub changes: Vec<CellChange>,
}

impl EditDelta {
    /// Compare two copies cell by cell.
    ///
    /// Rows are paired by position and columns by name; columns only in
    /// `after` are ignored.
    pub fn between(before: &JobTable, after: &JobTable) -> Self {
        let column_map: Vec<(usize, Option<usize>)> = before
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (i, after.column_index(&c.name)))
            .collect();

        let mut changes = Vec::new();
        for (old, new) in before.rows.iter().zip(&after.rows) {
            for &(bi, ai) in &column_map {
                let Some(ai) = ai else { continue };
                let (Some(b), Some(a)) = (old.cells.get(bi), new.cells.get(ai)) else {
                    continue;
                };
                if b != a {
                    changes.push(CellChange {
                        source_row: old.source_row,
                        column: before.columns[bi].name.clone(),
                        before: b.clone(),
                        after: a.clone(),
                    });
                }
            }
        }

        Self { changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Distinct names of the changed columns, in first-change order.
    pub fn columns(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for change in &self.changes {
            if !names.contains(&change.column.as_str()) {
                names.push(&change.column);
            }
        }
        names
    }

    /// `(source_row, new value)` for every changed favorite flag, by row.
    pub fn favorite_changes(&self) -> Vec<(usize, bool)> {
        let mut favorites: Vec<(usize, bool)> = self
            .changes
            .iter()
            .filter(|c| c.column == FAVORITE)
            .map(|c| (c.source_row, c.after.as_bool()))
            .collect();
        favorites.sort_by_key(|(row, _)| *row);
        favorites.dedup_by_key(|(row, _)| *row);
        favorites
    }

    /// Write the changed cells into the canonical table.
    ///
    /// Only columns that exist in the canonical schema are written. Returns
    /// the number of cells updated.
    pub fn apply_to(&self, canonical: &mut JobTable) -> usize {
        let mut applied = 0;
        for change in &self.changes {
            let Some(col) = canonical.column_index(&change.column) else {
                continue;
            };
            let Some(position) = canonical.position_of(change.source_row) else {
                continue;
            };
            canonical.rows[position].cells[col] = change.after.clone();
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnKind, ColumnSchema};
    use serde_json::json;

    fn table() -> JobTable {
        let mut table = JobTable::new(vec![
            ColumnSchema::new("Favorite", ColumnKind::Boolean),
            ColumnSchema::new("Project Value", ColumnKind::Number),
            ColumnSchema::new("Job Title", ColumnKind::Text),
        ]);
        for (fav, value, title) in [(false, 100.0, "Roof"), (true, 900.0, "Paving"), (false, 50.0, "Fence")] {
            table.push_row(vec![
                Value::Bool(fav),
                Value::Number(value),
                Value::Text(title.into()),
            ]);
        }
        table
    }

    #[test]
    fn test_no_edits_no_delta() {
        let view = table();
        let edited = edited_copy(&view, &[]);
        assert!(EditDelta::between(&view, &edited).is_empty());
    }

    #[test]
    fn test_resubmitting_same_values_is_not_a_change() {
        let view = table();
        let edits = vec![EditedRow::new(1)
            .with_value("Favorite", json!(true))
            .with_value("Project Value", json!(900))];
        let edited = edited_copy(&view, &edits);
        assert!(EditDelta::between(&view, &edited).is_empty());
    }

    #[test]
    fn test_delta_tracks_source_rows() {
        let full = table();
        let view = full.select(|r| r.source_row != 0);
        let edits = vec![
            EditedRow::new(2).with_value("Favorite", json!(true)),
            EditedRow::new(1).with_value("Job Title", json!("Paving lot B")),
            // Not in the view.
            EditedRow::new(0).with_value("Favorite", json!(true)),
            // Unknown column.
            EditedRow::new(1).with_value("Notes", json!("x")),
        ];
        let delta = EditDelta::between(&view, &edited_copy(&view, &edits));

        assert_eq!(delta.len(), 2);
        assert_eq!(delta.columns(), vec!["Job Title", "Favorite"]);
        assert_eq!(delta.favorite_changes(), vec![(2, true)]);
    }

    #[test]
    fn test_apply_to_canonical() {
        let mut canonical = table();
        let view = canonical.select(|r| r.source_row == 2);
        let edits = vec![EditedRow::new(2).with_value("Project Value", json!("$75"))];
        let delta = EditDelta::between(&view, &edited_copy(&view, &edits));

        assert_eq!(delta.apply_to(&mut canonical), 1);
        assert_eq!(canonical.get(2, 1), Some(&Value::Number(75.0)));
        // Untouched rows keep their values.
        assert_eq!(canonical.get(0, 1), Some(&Value::Number(100.0)));
    }

    #[test]
    fn test_apply_skips_columns_missing_from_canonical() {
        let mut canonical = JobTable::new(vec![ColumnSchema::new("Favorite", ColumnKind::Boolean)]);
        canonical.push_row(vec![Value::Bool(false)]);

        let delta = EditDelta {
            changes: vec![CellChange {
                source_row: 0,
                column: "Job Title".into(),
                before: Value::Null,
                after: Value::Text("x".into()),
            }],
        };
        assert_eq!(delta.apply_to(&mut canonical), 0);
    }
}
