//! Conjunctive predicate masking over a job table.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::criteria::{FilterCriteria, ViewMode};
use crate::schema::{JobTable, Value, BID_DATE, FAVORITE, PROJECT_VALUE};

/// Which filter controls a dashboard offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Offer the "All Jobs" / "Favorites" toggle.
    pub favorites_toggle: bool,
    /// Columns offered as multiselects, in sidebar order.
    pub category_columns: Vec<String>,
    /// Column used by the numeric range filter.
    pub value_column: String,
    /// Column used by the date range filter.
    pub date_column: String,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::favorites()
    }
}

impl FilterOptions {
    /// Favorites toggle, value range, bid date range.
    pub fn favorites() -> Self {
        Self {
            favorites_toggle: true,
            category_columns: Vec::new(),
            value_column: PROJECT_VALUE.to_string(),
            date_column: BID_DATE.to_string(),
        }
    }

    /// Job title and location multiselects, value range, bid date range.
    pub fn categories() -> Self {
        Self {
            favorites_toggle: false,
            category_columns: vec!["Job Title".to_string(), "Location".to_string()],
            value_column: PROJECT_VALUE.to_string(),
            date_column: BID_DATE.to_string(),
        }
    }

    pub fn with_category_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Multiselect over the distinct values of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryControl {
    pub column: String,
    /// Sorted distinct non-missing values.
    pub options: Vec<String>,
    pub selected: Vec<String>,
}

/// Slider over the non-missing values of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeControl {
    pub column: String,
    pub min: f64,
    pub max: f64,
    pub selected: (f64, f64),
    /// Fixed step when the control was widened around a single value.
    pub step: Option<f64>,
}

/// Date range picker over the non-missing values of a date column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateControl {
    pub column: String,
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub selected: (NaiveDate, NaiveDate),
}

/// The sidebar controls to show, with their current bounds and selections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterControls {
    pub view: Option<ViewMode>,
    pub categories: Vec<CategoryControl>,
    pub value: Option<RangeControl>,
    pub date: Option<DateControl>,
}

/// The filtered view plus the controls that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub view: JobTable,
    pub controls: FilterControls,
}

/// Applies filter criteria in a fixed order: view mode, categories, value
/// range, date range.
///
/// Each step sees the table as filtered by the steps before it, so control
/// bounds and options narrow as earlier filters are applied.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    options: FilterOptions,
}

impl FilterEngine {
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    /// Filter `table` without modifying it.
    pub fn apply(&self, table: &JobTable, criteria: &FilterCriteria) -> FilterOutcome {
        let mut view = table.clone();
        let mut controls = FilterControls::default();

        if self.options.favorites_toggle {
            controls.view = Some(criteria.view);
            if criteria.view == ViewMode::Favorites {
                if let Some(col) = view.column_index(FAVORITE) {
                    view = view.select(|r| r.cells[col].as_bool());
                }
            }
        }

        for column in &self.options.category_columns {
            let Some(col) = view.column_index(column) else {
                continue;
            };
            let options = distinct_values(&view, col);
            let selected = criteria.categories.get(column).cloned().unwrap_or_default();
            if !selected.is_empty() {
                view = view.select(|r| {
                    category_key(&r.cells[col]).is_some_and(|v| selected.contains(&v))
                });
            }
            controls.categories.push(CategoryControl {
                column: column.clone(),
                options,
                selected,
            });
        }

        if let Some(control) = value_control(&view, &self.options.value_column, criteria) {
            if let (Some((low, high)), Some(col)) =
                (criteria.value_range, view.column_index(&control.column))
            {
                view = view.select(|r| match r.cells[col].as_f64() {
                    Some(v) => v >= low && v <= high,
                    None => true,
                });
            }
            controls.value = Some(control);
        }

        if let Some(control) = date_control(&view, &self.options.date_column, criteria) {
            let bounds = criteria.date_range.as_ref().and_then(|s| s.bounds());
            if let (Some((start, end)), Some(col)) = (bounds, view.column_index(&control.column)) {
                view = view.select(|r| match r.cells[col].as_date() {
                    Some(d) => d >= start && d <= end,
                    None => false,
                });
            }
            controls.date = Some(control);
        }

        debug!(
            rows_in = table.row_count(),
            rows_out = view.row_count(),
            "applied filters"
        );

        FilterOutcome { view, controls }
    }
}

/// Filter with every supplied criterion honored, including any category column.
pub fn filter(table: &JobTable, criteria: &FilterCriteria) -> JobTable {
    let options = FilterOptions::favorites().with_category_columns(criteria.categories.keys().cloned());
    FilterEngine::new(options).apply(table, criteria).view
}

/// Text used to match a cell against category selections.
fn category_key(value: &Value) -> Option<String> {
    if value.is_missing() {
        None
    } else {
        Some(value.to_cell_string())
    }
}

fn distinct_values(table: &JobTable, col: usize) -> Vec<String> {
    table
        .column_values(col)
        .filter_map(category_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Range control over the current view, or None when there is nothing to range over.
fn value_control(table: &JobTable, column: &str, criteria: &FilterCriteria) -> Option<RangeControl> {
    let values = table.numbers(column);
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;

    // A single distinct value still gets a usable slider.
    let (lo, hi, step) = if min == max {
        (min - 1.0, max + 1.0, Some(1.0))
    } else {
        (min, max, None)
    };

    Some(RangeControl {
        column: column.to_string(),
        min: lo,
        max: hi,
        selected: criteria.value_range.unwrap_or((min, max)),
        step,
    })
}

fn date_control(table: &JobTable, column: &str, criteria: &FilterCriteria) -> Option<DateControl> {
    let dates = table.dates(column);
    let min = dates.iter().min().copied()?;
    let max = dates.iter().max().copied()?;

    Some(DateControl {
        column: column.to_string(),
        min,
        max,
        selected: criteria
            .date_range
            .as_ref()
            .and_then(|s| s.bounds())
            .unwrap_or((min, max)),
    })
}
