//! Typed in-memory table of job records.

use chrono::NaiveDate;
use serde::Serialize;

use super::types::{ColumnKind, DATE_FORMAT};
use crate::input::{coerce, RawTable};

/// A single typed cell.
///
/// Missing numbers, dates and text are `Null`; a missing boolean is `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    /// Parse a raw source string into a value of the given kind.
    ///
    /// Coercion never fails: anything unparseable becomes missing.
    pub fn parse(kind: ColumnKind, raw: &str) -> Self {
        match kind {
            ColumnKind::Boolean => Value::Bool(coerce::parse_favorite(raw)),
            ColumnKind::Number => coerce::parse_currency(raw)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ColumnKind::Date => coerce::parse_date(raw)
                .map(Value::Date)
                .unwrap_or(Value::Null),
            ColumnKind::Text => {
                if RawTable::is_null_value(raw) {
                    Value::Null
                } else {
                    Value::Text(raw.to_string())
                }
            }
        }
    }

    /// Coerce a JSON value submitted from the grid into a value of the given kind.
    pub fn from_json(kind: ColumnKind, json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match (kind, json) {
            (ColumnKind::Boolean, Json::Bool(b)) => Value::Bool(*b),
            (ColumnKind::Boolean, Json::String(s)) => Value::Bool(coerce::parse_favorite(s)),
            (ColumnKind::Boolean, _) => Value::Bool(false),
            (ColumnKind::Number, Json::Number(n)) => {
                n.as_f64().map(Value::Number).unwrap_or(Value::Null)
            }
            (_, Json::String(s)) => Value::parse(kind, s),
            (ColumnKind::Text, Json::Number(n)) => Value::Text(n.to_string()),
            (ColumnKind::Text, Json::Bool(b)) => Value::Text(b.to_string()),
            _ => Value::Null,
        }
    }

    /// Missing value for a column of the given kind.
    pub fn missing(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Boolean => Value::Bool(false),
            _ => Value::Null,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Render the value the way it is written back to a delimited file.
    ///
    /// Missing values render as an empty string and integral numbers drop
    /// their fractional part.
    pub fn to_cell_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Number(n) => n.to_string(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

/// Name and type tag of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// One record plus its position in the canonical table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Index of this row in the canonical table it was loaded into.
    pub source_row: usize,
    pub cells: Vec<Value>,
}

/// Ordered rows sharing one typed column schema.
///
/// The canonical table has `source_row == position` for every row. Filtered
/// views are copies that keep the canonical `source_row` of each row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobTable {
    pub columns: Vec<ColumnSchema>,
    pub rows: Vec<Row>,
}

impl JobTable {
    /// Create an empty table with the given columns.
    pub fn new(columns: Vec<ColumnSchema>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a row; it becomes the next canonical row.
    ///
    /// Short rows are padded with missing values and long rows truncated so
    /// every row matches the schema.
    pub fn push_row(&mut self, mut cells: Vec<Value>) {
        cells.truncate(self.columns.len());
        for column in &self.columns[cells.len()..] {
            cells.push(Value::missing(column.kind));
        }
        let source_row = self.rows.len();
        self.rows.push(Row { source_row, cells });
    }

    /// True when there are no rows to show.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.cells.get(index))
    }

    /// Non-missing numbers in a column.
    pub fn numbers(&self, name: &str) -> Vec<f64> {
        match self.column_index(name) {
            Some(index) => self.column_values(index).filter_map(Value::as_f64).collect(),
            None => Vec::new(),
        }
    }

    /// Non-missing dates in a column.
    pub fn dates(&self, name: &str) -> Vec<NaiveDate> {
        match self.column_index(name) {
            Some(index) => self.column_values(index).filter_map(Value::as_date).collect(),
            None => Vec::new(),
        }
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Find the position of the row with the given canonical index.
    pub fn position_of(&self, source_row: usize) -> Option<usize> {
        self.rows.iter().position(|r| r.source_row == source_row)
    }

    /// Copy of this table keeping only rows matching the predicate.
    pub fn select(&self, mut keep: impl FnMut(&Row) -> bool) -> JobTable {
        JobTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
