//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::Mutex;

use jobdash::page::{self, PageConfig};
use jobdash::{Dashboard, DashboardView, Interaction};

use super::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The dashboard; interactions run one at a time.
    pub dashboard: Arc<Mutex<Dashboard>>,
    /// Page configuration installed at startup.
    pub page: &'static PageConfig,
    pub subtitle: String,
}

impl AppState {
    /// Create new application state, installing the page configuration.
    pub fn new(dashboard: Dashboard) -> Self {
        let page = page::install(dashboard.config());
        let subtitle = dashboard.config().subtitle.clone();
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            page,
            subtitle,
        }
    }

    /// Run one interaction off the async executor.
    ///
    /// Loading and write-back do blocking I/O.
    pub async fn interact(&self, interaction: Interaction) -> Result<DashboardView, ApiError> {
        let dashboard = Arc::clone(&self.dashboard);
        tokio::task::spawn_blocking(move || dashboard.blocking_lock().interact(interaction))
            .await
            .map_err(|e| ApiError::Internal(format!("Interaction failed: {}", e)))
    }
}
