//! Typed table model and column type tags.

mod table;
mod types;

pub use table::{ColumnSchema, JobTable, Row, Value};
pub use types::{
    ColumnKind, Widget, BID_DATE, DATE_COLUMNS, DATE_FORMAT, FAVORITE, LAST_UPDATED,
    PROJECT_VALUE, START_DATE,
};
