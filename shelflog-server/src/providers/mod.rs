//! External catalog clients
//!
//! Each client normalizes one provider's raw items into [`CatalogItem`].
//! Book search runs through [`BookCatalog`], an ordered chain that falls
//! back from Aladin to Kakao to the scraped Yes24 storefront.

pub mod aladin;
pub mod kakao;
pub mod tmdb;
pub mod yes24;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shelflog_common::config::ServiceConfig;
use shelflog_common::fallback::{first_ok, Attempt};
use shelflog_common::{CatalogItem, Suggestion};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use aladin::AladinClient;
pub use kakao::KakaoClient;
pub use tmdb::TmdbClient;
pub use yes24::Yes24Client;

const USER_AGENT: &str = concat!("shelflog/", env!("CARGO_PKG_VERSION"));

/// Primary search page size
pub const SEARCH_RESULTS: usize = 10;
/// Autocomplete page size
pub const SUGGEST_RESULTS: usize = 5;

/// Catalog provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Success status but the body reports an error
    #[error("Provider rejected request: {0}")]
    Rejected(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Map a transport error without leaking the request URL (it carries keys)
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(timeout)
        } else {
            ProviderError::Network(e.without_url().to_string())
        }
    }
}

/// Which storefront section a book search targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchTarget {
    #[default]
    Book,
    EBook,
}

/// Build the HTTP client shared by every provider
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Network(e.to_string()))
}

/// Send a request and return the body of a successful response.
///
/// `timeout` bounds this one call, body included.
pub(crate) async fn fetch_text(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<String, ProviderError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api(status.as_u16(), error_text));
    }

    response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(e, timeout))
}

/// Send a request and decode a successful JSON response
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<T, ProviderError> {
    let body = fetch_text(request, timeout).await?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Treat empty strings as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A book catalog that can take part in the fallback chain
#[async_trait]
pub trait BookProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// False when a required credential is missing
    fn is_configured(&self) -> bool {
        true
    }

    async fn search(
        &self,
        query: &str,
        target: SearchTarget,
    ) -> Result<Vec<CatalogItem>, ProviderError>;

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError>;
}

/// Ordered chain of book providers
pub struct BookCatalog {
    providers: Vec<Arc<dyn BookProvider>>,
}

impl BookCatalog {
    pub fn new(providers: Vec<Arc<dyn BookProvider>>) -> Self {
        Self { providers }
    }

    /// Aladin, then Kakao, then Yes24
    pub fn from_config(http: &reqwest::Client, config: &ServiceConfig) -> Self {
        let timeout = config.upstream_timeout();
        Self::new(vec![
            Arc::new(AladinClient::new(
                http.clone(),
                config.providers.aladin_ttb_key.clone(),
                timeout,
            )),
            Arc::new(KakaoClient::new(
                http.clone(),
                config.providers.kakao_rest_api_key.clone(),
                timeout,
            )),
            Arc::new(Yes24Client::new(http.clone(), timeout)),
        ])
    }

    fn configured(&self) -> impl Iterator<Item = &Arc<dyn BookProvider>> {
        self.providers.iter().filter(|p| p.is_configured())
    }

    /// Search the first provider that answers successfully
    pub async fn search(
        &self,
        query: &str,
        target: SearchTarget,
    ) -> Result<Vec<CatalogItem>, ProviderError> {
        let attempts = self
            .configured()
            .map(|p| Attempt::new(p.name(), p.search(query, target)))
            .collect();
        first_ok(attempts, || ProviderError::NotConfigured("book search")).await
    }

    /// Autocomplete rows; failures produce an empty list
    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let attempts = self
            .configured()
            .map(|p| Attempt::new(p.name(), p.suggest(query)))
            .collect();
        match first_ok(attempts, || ProviderError::NotConfigured("book suggest")).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::warn!(error = %e, "Book suggestions unavailable");
                Vec::new()
            }
        }
    }
}
