//! Google Sheets v4 REST client.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{CellUpdate, SheetsApi};
use crate::error::{DashError, Result};

/// Sheets API endpoint.
const API_URL: &str = "https://sheets.googleapis.com";

/// Pre-provisioned credentials for the spreadsheet API.
///
/// The file holds an OAuth access token scoped for spreadsheet read/write and
/// file listing, e.g. `{"access_token": "ya29..."}`.
#[derive(Clone, Deserialize)]
pub struct SheetCredentials {
    #[serde(alias = "token")]
    access_token: String,
}

impl SheetCredentials {
    /// Create credentials from a bare access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Load credentials from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DashError::Credentials(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let credentials: SheetCredentials = serde_json::from_str(&text).map_err(|e| {
            DashError::Credentials(format!("Failed to parse '{}': {}", path.display(), e))
        })?;
        if credentials.access_token.trim().is_empty() {
            return Err(DashError::Credentials(format!(
                "'{}' has an empty access token",
                path.display()
            )));
        }
        Ok(credentials)
    }
}

impl std::fmt::Debug for SheetCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetCredentials")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Blocking client for the Sheets values API.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    credentials: SheetCredentials,
}

impl SheetsClient {
    /// Create a client against the public Sheets API.
    pub fn new(credentials: SheetCredentials) -> Result<Self> {
        Self::with_base_url(credentials, API_URL)
    }

    /// Create a client against another endpoint (a proxy or local emulator).
    pub fn with_base_url(credentials: SheetCredentials, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DashError::Config(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = Url::parse(base_url)
            .map_err(|e| DashError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.credentials.access_token))
                .map_err(|e| DashError::Credentials(format!("Invalid access token: {}", e)))?,
        );
        Ok(headers)
    }

    /// `{base}/v4/spreadsheets/{sheet_id}/{tail...}` with each segment escaped.
    fn endpoint(&self, sheet_id: &str, tail: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashError::Config(format!("API URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", sheet_id])
            .extend(tail);
        Ok(url)
    }

    fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().unwrap_or_default();
        Err(DashError::Sheets { status, message })
    }
}

impl SheetsApi for SheetsClient {
    fn fetch_values(&self, sheet_id: &str, worksheet: &str) -> Result<Vec<Vec<String>>> {
        let url = self.endpoint(sheet_id, &["values", worksheet])?;
        debug!(%url, "fetching worksheet values");

        let response = self
            .client
            .get(url)
            .headers(self.build_headers()?)
            .query(&[("valueRenderOption", "FORMATTED_VALUE")])
            .send()?;

        let range: ValueRange = Self::check(response)?.json()?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    fn batch_update(&self, sheet_id: &str, updates: &[CellUpdate]) -> Result<()> {
        let url = self.endpoint(sheet_id, &["values:batchUpdate"])?;
        let data: Vec<Value> = updates
            .iter()
            .map(|u| json!({ "range": u.range, "values": [[u.value]] }))
            .collect();
        let body = json!({
            "valueInputOption": "USER_ENTERED",
            "data": data,
        });
        debug!(%url, cells = updates.len(), "sending batch update");

        let response = self
            .client
            .post(url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()?;

        Self::check(response)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "google-sheets"
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
