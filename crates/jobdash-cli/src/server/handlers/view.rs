//! Dashboard view handlers.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use jobdash::{DashboardView, Interaction};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Render the dashboard with no filters applied.
pub async fn get_view(State(state): State<AppState>) -> Result<Json<DashboardView>, ApiError> {
    let view = state.interact(Interaction::default()).await?;
    Ok(Json(view))
}

/// Apply filters and edits, then render.
pub async fn post_view(
    State(state): State<AppState>,
    payload: Result<Json<Interaction>, JsonRejection>,
) -> Result<Json<DashboardView>, ApiError> {
    let Json(interaction) = payload?;
    tracing::debug!(
        edits = interaction.edits.len(),
        filtered = !interaction.criteria.is_empty(),
        "view requested"
    );
    let view = state.interact(interaction).await?;
    Ok(Json(view))
}
