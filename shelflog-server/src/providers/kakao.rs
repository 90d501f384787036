//! Kakao Daum book search
//!
//! Second link of the book chain. Kakao has no category taxonomy and no
//! page counts, so items carry no genres and no numeric fact.

use super::{fetch_json, non_empty, BookProvider, ProviderError, SearchTarget, SEARCH_RESULTS, SUGGEST_RESULTS};
use async_trait::async_trait;
use serde::Deserialize;
use shelflog_common::catalog::leading_year;
use shelflog_common::{CatalogItem, MediaType, Suggestion};
use std::time::Duration;
use tracing::info;

const KAKAO_BASE_URL: &str = "https://dapi.kakao.com";

#[derive(Debug, Deserialize)]
struct KakaoResponse {
    #[serde(default)]
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    thumbnail: Option<String>,
    url: Option<String>,
    /// `"<isbn10> <isbn13>"`, either part may be missing
    #[serde(default)]
    isbn: String,
    /// ISO 8601 datetime
    #[serde(default)]
    datetime: String,
}

/// Prefer the 13-digit ISBN
fn pick_isbn(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    parts
        .iter()
        .find(|p| p.len() == 13)
        .or_else(|| parts.first())
        .map(|p| p.to_string())
}

fn date_part(datetime: &str) -> Option<String> {
    datetime.get(..10).map(String::from)
}

impl KakaoDocument {
    fn into_item(self) -> CatalogItem {
        CatalogItem {
            authors: self
                .authors
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            publisher: non_empty(self.publisher),
            thumbnail: non_empty(self.thumbnail),
            isbn: pick_isbn(&self.isbn),
            published_date: date_part(&self.datetime),
            url: non_empty(self.url),
            ..CatalogItem::new(self.title, MediaType::Book)
        }
    }
}

/// Kakao book search client
pub struct KakaoClient {
    http: reqwest::Client,
    base_url: String,
    rest_api_key: Option<String>,
    timeout: Duration,
}

impl KakaoClient {
    pub fn new(http: reqwest::Client, rest_api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: KAKAO_BASE_URL.to_string(),
            rest_api_key,
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn documents(&self, query: &str, size: usize) -> Result<Vec<KakaoDocument>, ProviderError> {
        let key = self
            .rest_api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("Kakao REST API key"))?;

        let request = self
            .http
            .get(format!("{}/v3/search/book", self.base_url))
            .header("Authorization", format!("KakaoAK {}", key))
            .query(&[("query", query), ("size", size.to_string().as_str())]);

        let response: KakaoResponse = fetch_json(request, self.timeout).await?;
        Ok(response.documents)
    }
}

#[async_trait]
impl BookProvider for KakaoClient {
    fn name(&self) -> &'static str {
        "kakao"
    }

    fn is_configured(&self) -> bool {
        self.rest_api_key.is_some()
    }

    /// Kakao has no e-book section; both targets search the same index
    async fn search(
        &self,
        query: &str,
        _target: SearchTarget,
    ) -> Result<Vec<CatalogItem>, ProviderError> {
        let items: Vec<CatalogItem> = self
            .documents(query, SEARCH_RESULTS)
            .await?
            .into_iter()
            .map(KakaoDocument::into_item)
            .collect();

        info!(query, count = items.len(), "Kakao search complete");
        Ok(items)
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
        Ok(self
            .documents(query, SUGGEST_RESULTS)
            .await?
            .into_iter()
            .map(|doc| Suggestion {
                year: leading_year(&doc.datetime).map(String::from),
                author: doc.authors.into_iter().next(),
                title: doc.title,
            })
            .collect())
    }
}
