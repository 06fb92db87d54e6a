//! Dashboard orchestration: load, apply edits, filter, summarize, present.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::edit::{edited_copy, EditDelta, EditedRow, WriteReport};
use crate::filter::{FilterControls, FilterCriteria, FilterEngine, FilterOptions};
use crate::loader::{Loader, Notice};
use crate::metrics::{summarize, MetricCard, Metrics};
use crate::present::{present, Grid};
use crate::schema::JobTable;

/// Default reload interval of the page.
pub const DEFAULT_REFRESH_SECS: u64 = 60;

/// Configuration for one dashboard variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardConfig {
    pub title: String,
    pub subtitle: String,
    pub filters: FilterOptions,
    /// Whether grid edits are accepted and written back.
    pub editable: bool,
    /// Show the whole table when the filters leave no rows.
    pub show_all_when_empty: bool,
    /// Seconds between automatic reloads of the page.
    pub refresh_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::favorites()
    }
}

impl DashboardConfig {
    /// Editable dashboard with a favorites toggle.
    pub fn favorites() -> Self {
        Self {
            title: "Dashboard".to_string(),
            subtitle: "Browse and filter job opportunities.".to_string(),
            filters: FilterOptions::favorites(),
            editable: true,
            show_all_when_empty: false,
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }

    /// Read-only dashboard with job title and location filters.
    pub fn categories() -> Self {
        Self {
            title: "Dashboard".to_string(),
            subtitle: "Browse and filter job opportunities.".to_string(),
            filters: FilterOptions::categories(),
            editable: false,
            show_all_when_empty: true,
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_refresh_secs(mut self, secs: u64) -> Self {
        self.refresh_secs = secs;
        self
    }
}

/// One user interaction: the current filters plus any grid edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interaction {
    pub criteria: FilterCriteria,
    pub edits: Vec<EditedRow>,
}

impl Interaction {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            edits: Vec::new(),
        }
    }

    pub fn with_edits(mut self, edits: Vec<EditedRow>) -> Self {
        self.edits = edits;
        self
    }
}

/// Per-session state carried from one interaction to the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub criteria: FilterCriteria,
    /// Number of views rendered in this session.
    pub renders: u64,
}

/// Metrics with their formatted cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsView {
    #[serde(flatten)]
    pub metrics: Metrics,
    pub cards: Vec<MetricCard>,
}

/// Everything the page needs to render one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub subtitle: String,
    pub notices: Vec<Notice>,
    pub controls: FilterControls,
    /// None when no data is loaded.
    pub metrics: Option<MetricsView>,
    /// None when no data is loaded.
    pub grid: Option<Grid>,
    /// Rows in the unfiltered table.
    pub total_rows: usize,
    pub refresh_secs: u64,
}

/// Render one interaction over an already loaded table.
///
/// Pure: the table is not modified and the returned session replaces the
/// one passed in.
pub fn handle_interaction(
    config: &DashboardConfig,
    session: &SessionState,
    table: &JobTable,
) -> (SessionState, DashboardView) {
    let next = SessionState {
        criteria: session.criteria.clone(),
        renders: session.renders + 1,
    };

    let mut view = DashboardView {
        title: config.title.clone(),
        subtitle: config.subtitle.clone(),
        notices: Vec::new(),
        controls: FilterControls::default(),
        metrics: None,
        grid: None,
        total_rows: table.row_count(),
        refresh_secs: config.refresh_secs,
    };

    if table.is_empty() {
        view.notices.push(Notice::warning("No data loaded."));
        return (next, view);
    }

    let outcome = FilterEngine::new(config.filters.clone()).apply(table, &session.criteria);
    let metrics = summarize(&outcome.view);

    let shown = if config.show_all_when_empty && outcome.view.is_empty() {
        table
    } else {
        &outcome.view
    };

    view.controls = outcome.controls;
    view.grid = Some(present(shown, config.editable));
    view.metrics = Some(MetricsView {
        cards: metrics.cards(),
        metrics,
    });

    (next, view)
}

/// A dashboard bound to one data source.
///
/// Owns the canonical table; every interaction reloads it from the source
/// before filtering, so external changes show up on the next interaction.
pub struct Dashboard {
    config: DashboardConfig,
    loader: Loader,
    canonical: JobTable,
    session: SessionState,
    last_hash: Option<String>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, loader: Loader) -> Self {
        Self {
            config,
            loader,
            canonical: JobTable::empty(),
            session: SessionState::default(),
            last_hash: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The table as of the last interaction.
    pub fn canonical(&self) -> &JobTable {
        &self.canonical
    }

    /// Reload, persist any edits, then render.
    pub fn interact(&mut self, interaction: Interaction) -> DashboardView {
        let mut notices = Vec::new();
        notices.extend(self.reload());

        if !interaction.edits.is_empty() {
            if self.config.editable {
                notices.extend(self.commit_edits(&interaction.criteria, &interaction.edits));
            } else {
                debug!(rows = interaction.edits.len(), "ignoring edits on read-only dashboard");
            }
        }

        self.session.criteria = interaction.criteria;
        let (session, mut view) = handle_interaction(&self.config, &self.session, &self.canonical);
        self.session = session;

        notices.append(&mut view.notices);
        view.notices = notices;
        view
    }

    /// Re-render with the current filters, as the periodic refresh does.
    pub fn refresh(&mut self) -> DashboardView {
        let criteria = self.session.criteria.clone();
        self.interact(Interaction::new(criteria))
    }

    fn reload(&mut self) -> Option<Notice> {
        let loaded = self.loader.load();
        if let Some(metadata) = &loaded.metadata {
            if self.last_hash.as_deref() != Some(metadata.hash.as_str()) {
                if self.last_hash.is_some() {
                    info!(source = %metadata.location, "source changed since last load");
                }
                self.last_hash = Some(metadata.hash.clone());
            }
        }
        self.canonical = loaded.table;
        loaded.notice
    }

    /// Diff the edited grid against the view it was made from and write back.
    ///
    /// The canonical table is updated before the write and is not rolled
    /// back if the write fails.
    fn commit_edits(&mut self, criteria: &FilterCriteria, edits: &[EditedRow]) -> Option<Notice> {
        if self.canonical.is_empty() {
            return None;
        }

        let before = FilterEngine::new(self.config.filters.clone())
            .apply(&self.canonical, criteria)
            .view;
        let after = edited_copy(&before, edits);
        let delta = EditDelta::between(&before, &after);
        if delta.is_empty() {
            return None;
        }

        delta.apply_to(&mut self.canonical);

        match self.loader.backend().write_back(&self.canonical, &delta) {
            Ok(WriteReport::Rewrote { .. }) => Some(Notice::success("Jobs updated")),
            Ok(WriteReport::Updated { cells }) => {
                Some(Notice::success(format!("Updated {} favorite(s)", cells)))
            }
            Ok(WriteReport::Skipped) => None,
            Ok(WriteReport::Unsaved { reason }) => Some(Notice::warning(reason)),
            Err(e) => {
                warn!(error = %e, changes = delta.len(), "failed to write edits back");
                Some(Notice::error(format!("Error saving changes: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ViewMode;
    use crate::loader::NoticeLevel;
    use crate::schema::{ColumnKind, ColumnSchema, Value};

    fn table(values: &[Option<f64>]) -> JobTable {
        let mut table = JobTable::new(vec![
            ColumnSchema::new("Favorite", ColumnKind::Boolean),
            ColumnSchema::new("Project Value", ColumnKind::Number),
        ]);
        for v in values {
            table.push_row(vec![Value::Bool(false), v.map(Value::Number).unwrap_or(Value::Null)]);
        }
        table
    }

    #[test]
    fn test_empty_table_warns() {
        let (session, view) =
            handle_interaction(&DashboardConfig::favorites(), &SessionState::default(), &JobTable::empty());
        assert_eq!(session.renders, 1);
        assert_eq!(view.notices, vec![Notice::warning("No data loaded.")]);
        assert!(view.grid.is_none());
        assert!(view.metrics.is_none());
    }

    #[test]
    fn test_metrics_follow_filtered_view() {
        let session = SessionState {
            criteria: FilterCriteria::new().with_value_range(200.0, 1000.0),
            renders: 0,
        };
        let (_, view) =
            handle_interaction(&DashboardConfig::favorites(), &session, &table(&[Some(100.0), Some(900.0)]));

        let metrics = view.metrics.unwrap();
        assert_eq!(metrics.metrics.count, 1);
        assert_eq!(metrics.cards[1].value, "$900");
        assert_eq!(view.total_rows, 2);
    }

    #[test]
    fn test_show_all_when_empty() {
        let session = SessionState {
            criteria: FilterCriteria::new().with_value_range(5000.0, 6000.0),
            renders: 0,
        };
        let data = table(&[Some(100.0), Some(900.0)]);

        let (_, view) = handle_interaction(&DashboardConfig::categories(), &session, &data);
        assert_eq!(view.metrics.unwrap().metrics.count, 0);
        assert_eq!(view.grid.unwrap().rows.len(), 2);

        let (_, view) = handle_interaction(&DashboardConfig::favorites(), &session, &data);
        assert_eq!(view.grid.unwrap().rows.len(), 0);
    }

    #[test]
    fn test_grid_editability_follows_config() {
        let data = table(&[Some(1.0)]);
        let (_, view) = handle_interaction(&DashboardConfig::favorites(), &SessionState::default(), &data);
        assert!(view.grid.unwrap().editable);
        let (_, view) = handle_interaction(&DashboardConfig::categories(), &SessionState::default(), &data);
        assert!(!view.grid.unwrap().editable);
    }

    #[test]
    fn test_interaction_json_defaults() {
        let interaction: Interaction = serde_json::from_str(r#"{"criteria": {"view": "favorites"}}"#).unwrap();
        assert_eq!(interaction.criteria.view, ViewMode::Favorites);
        assert!(interaction.edits.is_empty());

        let interaction: Interaction = serde_json::from_str("{}").unwrap();
        assert_eq!(interaction, Interaction::default());
    }

    #[test]
    fn test_notice_levels_serialize() {
        let json = serde_json::to_value(Notice::error("x")).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(Notice::success("ok").level, NoticeLevel::Success);
    }
}
