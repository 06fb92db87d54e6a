//! Page configuration handler.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::state::AppState;

/// Response for the page endpoint.
#[derive(Serialize)]
pub struct PageResponse {
    pub title: String,
    pub subtitle: String,
    pub layout: &'static str,
    pub stylesheet: &'static str,
    /// Seconds between automatic reloads.
    pub refresh_secs: u64,
}

/// Get the page title, stylesheet and refresh interval.
pub async fn get_page(State(state): State<AppState>) -> Json<PageResponse> {
    Json(PageResponse {
        title: state.page.title.clone(),
        subtitle: state.subtitle.clone(),
        layout: state.page.layout,
        stylesheet: state.page.stylesheet,
        refresh_secs: state.page.refresh_secs,
    })
}
