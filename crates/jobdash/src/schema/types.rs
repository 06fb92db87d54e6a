//! Column type tags and the grid widgets they map to.

use serde::{Deserialize, Serialize};

/// Name of the boolean favorite flag, always the first column of a loaded table.
pub const FAVORITE: &str = "Favorite";
/// Name of the currency column.
pub const PROJECT_VALUE: &str = "Project Value";
/// Primary date column, used by the date range filter.
pub const BID_DATE: &str = "Bid Date";
pub const START_DATE: &str = "Start Date";
pub const LAST_UPDATED: &str = "Last Updated";

/// Columns parsed as calendar dates when present.
pub const DATE_COLUMNS: [&str; 3] = [BID_DATE, START_DATE, LAST_UPDATED];

/// Format used for dates in the grid and when writing files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Type tag for a column, decided once at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// True/false flag.
    Boolean,
    /// Floating-point number.
    Number,
    /// Calendar date without a time component.
    Date,
    /// Free text.
    #[default]
    Text,
}

impl ColumnKind {
    /// Pick the type tag for a column by its name.
    pub fn for_column(name: &str) -> Self {
        if name == FAVORITE {
            ColumnKind::Boolean
        } else if name == PROJECT_VALUE {
            ColumnKind::Number
        } else if DATE_COLUMNS.contains(&name) {
            ColumnKind::Date
        } else {
            ColumnKind::Text
        }
    }

    /// The grid widget used to render and edit this column.
    pub fn widget(&self) -> Widget {
        match self {
            ColumnKind::Boolean => Widget::Checkbox,
            ColumnKind::Date => Widget::DatePicker {
                format: "YYYY-MM-DD".to_string(),
            },
            ColumnKind::Number => Widget::Number,
            ColumnKind::Text => Widget::Text,
        }
    }
}

/// Editable grid widget for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Checkbox,
    DatePicker { format: String },
    Number,
    Text,
}
