//! Notion destination store
//!
//! Thin client over the three endpoints the service uses (database query,
//! database retrieve, page create) plus the builders that shape a
//! [`CatalogItem`](shelflog_common::CatalogItem) into a page.

pub mod duplicate;
pub mod entry;
pub mod property;
pub mod schema;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub use duplicate::{check_duplicate, DuplicateCheck};
pub use entry::{build_entry, display_title, NewPage};
pub use schema::{build_adaptive_entry, tense_options, DatabaseSchema};

const NOTION_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Notion API errors
#[derive(Debug, Error)]
pub enum NotionError {
    #[error("Notion token or database id is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Notion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One row returned by a database query
#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    pub id: String,
    pub url: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<PageObject>,
}

/// Identity of a newly created page
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPage {
    pub id: String,
    pub url: Option<String>,
}

/// Notion REST client bound to one database
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    database_id: Option<String>,
    timeout: Duration,
}

impl NotionClient {
    pub fn new(
        http: reqwest::Client,
        token: Option<String>,
        database_id: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: NOTION_BASE_URL.to_string(),
            token,
            database_id,
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn credentials(&self) -> Result<(&str, &str), NotionError> {
        match (self.token.as_deref(), self.database_id.as_deref()) {
            (Some(token), Some(database_id)) => Ok((token, database_id)),
            _ => Err(NotionError::NotConfigured),
        }
    }

    /// Database id pages are created under
    pub fn database_id(&self) -> Result<&str, NotionError> {
        self.credentials().map(|(_, id)| id)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, NotionError> {
        let (token, _) = self.credentials()?;
        let response = request
            .bearer_auth(token)
            .header("Notion-Version", NOTION_VERSION)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| NotionError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotionError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        response
            .json()
            .await
            .map_err(|e| NotionError::Parse(e.without_url().to_string()))
    }

    /// POST /databases/{id}/query with a filter object
    pub async fn query_database(&self, filter: Value) -> Result<QueryResponse, NotionError> {
        let (_, database_id) = self.credentials()?;
        debug!("Notion database query");
        let request = self
            .http
            .post(format!("{}/databases/{}/query", self.base_url, database_id))
            .json(&json!({ "filter": filter }));
        self.send(request).await
    }

    /// GET /databases/{id}
    pub async fn retrieve_database(&self) -> Result<DatabaseSchema, NotionError> {
        let (_, database_id) = self.credentials()?;
        debug!("Notion database retrieve");
        let request = self
            .http
            .get(format!("{}/databases/{}", self.base_url, database_id));
        self.send(request).await
    }

    /// POST /pages
    pub async fn create_page(&self, page: &NewPage) -> Result<CreatedPage, NotionError> {
        self.credentials()?;
        debug!("Notion page create");
        let request = self.http.post(format!("{}/pages", self.base_url)).json(page);
        self.send(request).await
    }
}
