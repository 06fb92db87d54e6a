//! Process-wide page setup.
//!
//! The page title, layout and stylesheet are installed once per process.
//! Later calls return the first installation unchanged.

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::dashboard::DashboardConfig;

/// Styling for the metric cards and page chrome.
pub const STYLESHEET: &str = r#"
body { font-family: "Source Sans Pro", sans-serif; background: #f7f9fc; }
.kpi-card {
    background: #ffffff;
    border-radius: 12px;
    box-shadow: 0 2px 8px rgba(0, 0, 0, 0.08);
    padding: 20px;
    text-align: center;
}
.kpi-title { color: #6c757d; font-size: 14px; font-weight: 600; margin-bottom: 6px; }
.kpi-value { color: #1f2d3d; font-size: 28px; font-weight: 700; }
.notice-success { color: #155724; background: #d4edda; }
.notice-warning { color: #856404; background: #fff3cd; }
.notice-error { color: #721c24; background: #f8d7da; }
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageConfig {
    pub title: String,
    pub layout: &'static str,
    pub stylesheet: &'static str,
    pub refresh_secs: u64,
}

impl PageConfig {
    pub fn from_dashboard(config: &DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            layout: "wide",
            stylesheet: STYLESHEET,
            refresh_secs: config.refresh_secs,
        }
    }
}

static PAGE: OnceCell<PageConfig> = OnceCell::new();

/// Install the page configuration for this process, once.
pub fn install(config: &DashboardConfig) -> &'static PageConfig {
    PAGE.get_or_init(|| {
        tracing::debug!(title = %config.title, "installing page configuration");
        PageConfig::from_dashboard(config)
    })
}

/// The installed page configuration, if any.
pub fn installed() -> Option<&'static PageConfig> {
    PAGE.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_is_idempotent() {
        let first = install(&DashboardConfig::favorites().with_title("First"));
        let second = install(&DashboardConfig::categories().with_title("Second"));
        assert!(std::ptr::eq(first, second));
        assert_eq!(installed(), Some(first));
        assert_eq!(first.layout, "wide");
        assert!(first.stylesheet.contains(".kpi-card"));
    }
}
