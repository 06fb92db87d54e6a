//! User-chosen filter values for one interaction.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which rows the view mode lets through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    All,
    Favorites,
}

impl ViewMode {
    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::All => "All Jobs",
            ViewMode::Favorites => "Favorites",
        }
    }
}

/// A date range as picked in the sidebar.
///
/// The picker may hand back a pair, a single date, or a partial list while
/// the user is still choosing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateSelection {
    Range(NaiveDate, NaiveDate),
    Single(NaiveDate),
    Partial(Vec<NaiveDate>),
}

impl DateSelection {
    /// Inclusive bounds; a single date is both bounds.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            DateSelection::Range(start, end) => Some((*start, *end)),
            DateSelection::Single(day) => Some((*day, *day)),
            DateSelection::Partial(days) => match days.as_slice() {
                [start, end] => Some((*start, *end)),
                [first, ..] => Some((*first, *first)),
                [] => None,
            },
        }
    }
}

/// Filter criteria for one interaction. Nothing here is persisted.
///
/// Absent fields apply no restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub view: ViewMode,
    /// Allowed values per category column. An empty list allows everything.
    pub categories: IndexMap<String, Vec<String>>,
    /// Inclusive project value range.
    pub value_range: Option<(f64, f64)>,
    /// Primary date range.
    pub date_range: Option<DateSelection>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(mut self, view: ViewMode) -> Self {
        self.view = view;
        self
    }

    pub fn with_category<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .insert(column.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_value_range(mut self, low: f64, high: f64) -> Self {
        self.value_range = Some((low, high));
        self
    }

    pub fn with_date_range(mut self, selection: DateSelection) -> Self {
        self.date_range = Some(selection);
        self
    }

    /// True when no filter would restrict anything.
    pub fn is_empty(&self) -> bool {
        self.view == ViewMode::All
            && self.categories.values().all(|v| v.is_empty())
            && self.value_range.is_none()
            && self
                .date_range
                .as_ref()
                .and_then(DateSelection::bounds)
                .is_none()
    }
}
