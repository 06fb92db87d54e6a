//! Integration tests for the dashboard pipeline over file and sheet backends.

use std::io::Write;
use std::sync::Arc;

use serde_json::json;
use tempfile::{NamedTempFile, TempDir};

use jobdash::sheets::SheetsApi;
use jobdash::{
    Dashboard, DashboardConfig, EditedRow, FileBackend, FilterCriteria, Interaction, Loader,
    MockSheets, NoticeLevel, SheetBackend, Value, ViewMode,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn jobs_csv() -> &'static str {
    "Job Title,Location,Project Value,Bid Date\n\
     Roof repair,Austin,\"$1,500\",2024-01-05\n\
     School addition,Round Rock,\"$250,000\",2024-02-10\n\
     Parking lot,Austin,,\n\
     Clinic fit-out,Austin,\"$80,000\",2024-03-01\n"
}

fn file_dashboard(path: &std::path::Path, config: DashboardConfig) -> Dashboard {
    Dashboard::new(config, Loader::new(FileBackend::new(path)))
}

fn sheet_grid() -> MockSheets {
    MockSheets::from_rows(&[
        &["Favorite", "Job Title", "Project Value"],
        &["FALSE", "Roof repair", "1500"],
        &["TRUE", "School addition", "250000"],
        &["FALSE", "Parking lot", ""],
        &["FALSE", "Clinic fit-out", "80000"],
    ])
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_inserts_favorite_first() {
    let file = create_test_file(jobs_csv());
    let mut dashboard = file_dashboard(file.path(), DashboardConfig::favorites());

    let view = dashboard.interact(Interaction::default());

    assert!(view.notices.is_empty());
    assert_eq!(view.total_rows, 4);
    let grid = view.grid.expect("grid");
    assert_eq!(grid.columns[0].name, "Favorite");
    assert_eq!(grid.rows[0].cells[0], Value::Bool(false));
    assert_eq!(grid.rows[3].display_index, 4);
}

#[test]
fn test_missing_file_gives_error_notice_and_empty_table() {
    let dir = TempDir::new().unwrap();
    let mut dashboard = file_dashboard(&dir.path().join("absent.csv"), DashboardConfig::favorites());

    let view = dashboard.interact(Interaction::default());

    assert_eq!(view.notices.len(), 2);
    assert_eq!(view.notices[0].level, NoticeLevel::Error);
    assert!(view.notices[0].message.starts_with("Error loading file: "));
    assert_eq!(view.notices[1].message, "No data loaded.");
    assert!(view.grid.is_none());
    assert!(dashboard.canonical().is_empty());
}

#[test]
fn test_metrics_over_filtered_view() {
    let file = create_test_file(jobs_csv());
    let mut dashboard = file_dashboard(file.path(), DashboardConfig::categories());

    let criteria = FilterCriteria::new().with_category("Location", ["Austin"]);
    let view = dashboard.interact(Interaction::new(criteria));

    let metrics = view.metrics.expect("metrics");
    assert_eq!(metrics.metrics.count, 3);
    assert_eq!(metrics.cards[0].value, "3");
    assert_eq!(metrics.cards[1].value, "$1,500");
    assert_eq!(metrics.cards[2].value, "$80,000");
}

#[test]
fn test_external_change_is_picked_up_on_next_interaction() {
    let file = create_test_file(jobs_csv());
    let mut dashboard = file_dashboard(file.path(), DashboardConfig::favorites());
    assert_eq!(dashboard.interact(Interaction::default()).total_rows, 4);

    std::fs::write(file.path(), "Job Title,Project Value\nOnly,10\n").unwrap();

    assert_eq!(dashboard.refresh().total_rows, 1);
}

// =============================================================================
// File write-back
// =============================================================================

#[test]
fn test_favorite_edit_rewrites_file() {
    let file = create_test_file("Job Title,Project Value,Bid Date\nRoof repair,1234,2024-01-05\n");
    let mut dashboard = file_dashboard(file.path(), DashboardConfig::favorites());

    let edits = vec![EditedRow::new(0).with_value("Favorite", json!(true))];
    let view = dashboard.interact(Interaction::default().with_edits(edits));

    assert_eq!(view.notices.len(), 1);
    assert_eq!(view.notices[0].level, NoticeLevel::Success);
    assert_eq!(view.notices[0].message, "Jobs updated");

    let written = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(
        written,
        "Favorite,Job Title,Project Value,Bid Date\nTrue,Roof repair,1234,2024-01-05\n"
    );

    // Reloading the rewritten file yields the same values.
    let view = dashboard.interact(Interaction::new(FilterCriteria::new().with_view(ViewMode::Favorites)));
    let grid = view.grid.expect("grid");
    assert_eq!(grid.rows.len(), 1);
    assert_eq!(grid.rows[0].cells[0], Value::Bool(true));
    assert_eq!(grid.rows[0].cells[2], Value::Number(1234.0));
}

#[test]
fn test_edit_in_filtered_view_keeps_other_rows() {
    let file = create_test_file(jobs_csv());
    let mut dashboard = file_dashboard(file.path(), DashboardConfig::favorites());

    // Row 0 falls outside the range; edit the row at source index 3.
    let criteria = FilterCriteria::new().with_value_range(50_000.0, 300_000.0);
    let edits = vec![EditedRow::new(3).with_value("Job Title", json!("Clinic remodel"))];
    dashboard.interact(Interaction::new(criteria).with_edits(edits));

    let written = std::fs::read_to_string(file.path()).unwrap();
    assert!(written.contains("Roof repair"));
    assert!(written.contains("Parking lot"));
    assert!(written.contains("Clinic remodel"));
    assert!(!written.contains("Clinic fit-out"));
}

#[test]
fn test_unchanged_edits_do_not_write() {
    let file = create_test_file(jobs_csv());
    let mut dashboard = file_dashboard(file.path(), DashboardConfig::favorites());

    let edits = vec![EditedRow::new(0).with_value("Job Title", json!("Roof repair"))];
    let view = dashboard.interact(Interaction::default().with_edits(edits));

    assert!(view.notices.is_empty());
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), jobs_csv());
}

#[test]
fn test_read_only_dashboard_ignores_edits() {
    let file = create_test_file(jobs_csv());
    let mut dashboard = file_dashboard(file.path(), DashboardConfig::categories());

    let edits = vec![EditedRow::new(0).with_value("Favorite", json!(true))];
    let view = dashboard.interact(Interaction::default().with_edits(edits));

    assert!(view.notices.is_empty());
    assert!(!view.grid.unwrap().editable);
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), jobs_csv());
}

// =============================================================================
// Sheet write-back
// =============================================================================

#[test]
fn test_sheet_favorite_update_addresses_row_plus_two() {
    let mock = Arc::new(sheet_grid());
    let api: Arc<dyn SheetsApi> = mock.clone();
    let loader = Loader::new(SheetBackend::new("sheet-1", "Jobs", api));
    let mut dashboard = Dashboard::new(DashboardConfig::favorites(), loader);

    let edits = vec![EditedRow::new(3).with_value("Favorite", json!(true))];
    let view = dashboard.interact(Interaction::default().with_edits(edits));

    assert_eq!(view.notices[0].level, NoticeLevel::Success);
    let batches = mock.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].range, "Jobs!A5");
    assert_eq!(batches[0][0].value, "TRUE");
    assert_eq!(mock.grid()[4][0], "TRUE");
}

#[test]
fn test_sheet_favorite_update_targets_its_own_column() {
    let mock = Arc::new(MockSheets::from_rows(&[
        &["Job Title", "Favorite", "Project Value"],
        &["Roof repair", "FALSE", "1500"],
        &["School addition", "TRUE", "250000"],
    ]));
    let api: Arc<dyn SheetsApi> = mock.clone();
    let mut dashboard = Dashboard::new(
        DashboardConfig::favorites(),
        Loader::new(SheetBackend::new("sheet-1", "Jobs", api)),
    );

    let edits = vec![EditedRow::new(0).with_value("Favorite", json!(true))];
    let view = dashboard.interact(Interaction::default().with_edits(edits));

    assert_eq!(view.notices[0].level, NoticeLevel::Success);
    let batches = mock.batches();
    assert_eq!(batches[0][0].range, "Jobs!B2");
    let grid = mock.grid();
    assert_eq!(grid[1], vec!["Roof repair", "TRUE", "1500"]);

    dashboard.interact(Interaction::default());
    assert_eq!(dashboard.canonical().get(0, 0), Some(&Value::Bool(true)));
    assert_eq!(
        dashboard.canonical().get(0, 1),
        Some(&Value::Text("Roof repair".into()))
    );
}

#[test]
fn test_sheet_without_favorite_column_writes_nothing() {
    let mock = Arc::new(MockSheets::from_rows(&[
        &["Job Title", "Project Value"],
        &["Roof repair", "100"],
        &["Parking lot", "200"],
    ]));
    let api: Arc<dyn SheetsApi> = mock.clone();
    let mut dashboard = Dashboard::new(
        DashboardConfig::favorites(),
        Loader::new(SheetBackend::new("sheet-1", "Jobs", api)),
    );

    let edits = vec![EditedRow::new(0).with_value("Favorite", json!(true))];
    let view = dashboard.interact(Interaction::default().with_edits(edits));

    assert_eq!(view.notices.len(), 1);
    assert_eq!(view.notices[0].level, NoticeLevel::Warning);
    assert!(view.notices[0].message.contains("Favorite"));
    assert!(mock.batches().is_empty());
    assert_eq!(mock.grid()[1], vec!["Roof repair", "100"]);
}

#[test]
fn test_sheet_non_favorite_edits_are_not_sent() {
    let mock = Arc::new(sheet_grid());
    let api: Arc<dyn SheetsApi> = mock.clone();
    let mut dashboard = Dashboard::new(
        DashboardConfig::favorites(),
        Loader::new(SheetBackend::new("sheet-1", "Jobs", api)),
    );

    let edits = vec![EditedRow::new(0).with_value("Job Title", json!("Renamed"))];
    let view = dashboard.interact(Interaction::default().with_edits(edits));

    assert!(view.notices.is_empty());
    assert!(mock.batches().is_empty());
}

#[test]
fn test_sheet_failed_update_reports_error_without_rollback() {
    let mock = Arc::new(sheet_grid().failing_updates("quota exceeded"));
    let api: Arc<dyn SheetsApi> = mock.clone();
    let mut dashboard = Dashboard::new(
        DashboardConfig::favorites(),
        Loader::new(SheetBackend::new("sheet-1", "Jobs", api)),
    );

    let edits = vec![EditedRow::new(0).with_value("Favorite", json!(true))];
    let view = dashboard.interact(Interaction::default().with_edits(edits));

    assert_eq!(view.notices.len(), 1);
    assert_eq!(view.notices[0].level, NoticeLevel::Error);
    assert!(view.notices[0].message.contains("quota exceeded"));
    assert_eq!(dashboard.canonical().get(0, 0), Some(&Value::Bool(true)));
    assert_eq!(mock.grid()[1][0], "FALSE");
}

#[test]
fn test_sheet_fetch_failure_gives_empty_table() {
    let api: Arc<dyn SheetsApi> = Arc::new(sheet_grid().failing_fetch("forbidden"));
    let mut dashboard = Dashboard::new(
        DashboardConfig::favorites(),
        Loader::new(SheetBackend::new("sheet-1", "Jobs", api)),
    );

    let view = dashboard.interact(Interaction::default());

    assert_eq!(view.notices[0].level, NoticeLevel::Error);
    assert_eq!(view.total_rows, 0);
}
