//! Jobdash: filterable job-listing dashboards over a CSV file or a spreadsheet.
//!
//! A dashboard loads a table of job listings, narrows it with a small set of
//! filters, summarizes the result in three metrics and presents it as a grid.
//! Edits made in the grid are written back to the source.
//!
//! # Data flow
//!
//! - **Load**: read the source, decode, parse and type the columns
//! - **Filter**: favorites view, categories, value range, date range
//! - **Summarize**: project count and value extremes
//! - **Present**: grid with a widget per column
//! - **Write back**: rewrite the file, or update favorites in the sheet
//!
//! # Example
//!
//! ```no_run
//! use jobdash::{Dashboard, DashboardConfig, FileBackend, Interaction, Loader};
//!
//! let loader = Loader::new(FileBackend::new("jobs.csv"));
//! let mut dashboard = Dashboard::new(DashboardConfig::favorites(), loader);
//! let view = dashboard.interact(Interaction::default());
//!
//! for card in &view.metrics.unwrap().cards {
//!     println!("{}: {}", card.label, card.value);
//! }
//! ```

pub mod backend;
pub mod dashboard;
pub mod edit;
pub mod error;
pub mod filter;
pub mod input;
pub mod loader;
pub mod metrics;
pub mod page;
pub mod present;
pub mod schema;
pub mod sheets;

pub use backend::{Backend, DataSource, FileBackend, SheetBackend};
pub use dashboard::{
    handle_interaction, Dashboard, DashboardConfig, DashboardView, Interaction, MetricsView,
    SessionState,
};
pub use edit::{EditDelta, EditSink, EditedRow, WriteReport};
pub use error::{DashError, Result};
pub use filter::{filter, FilterControls, FilterCriteria, FilterEngine, FilterOptions, ViewMode};
pub use input::{Parser, ParserConfig, RawTable, SourceMetadata};
pub use loader::{Loaded, Loader, Notice, NoticeLevel};
pub use metrics::{summarize, Metrics};
pub use present::{present, Grid};
pub use schema::{ColumnKind, ColumnSchema, JobTable, Value};
pub use sheets::{MockSheets, SheetCredentials, SheetsApi, SheetsClient};
