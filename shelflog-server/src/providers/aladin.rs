//! Aladin Open API client
//!
//! Search hits carry a category path but no page count, so each hit is
//! completed with an `ItemLookUp` call. Lookups run concurrently and a
//! failed lookup degrades the item instead of failing the search.

use super::{
    fetch_text, non_empty, BookProvider, ProviderError, SearchTarget, SEARCH_RESULTS,
    SUGGEST_RESULTS,
};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use shelflog_common::authors::parse_authors;
use shelflog_common::catalog::leading_year;
use shelflog_common::taxonomy::normalize_category_path;
use shelflog_common::{CatalogItem, MediaType, Suggestion};
use std::time::Duration;
use tracing::{debug, info, warn};

const ALADIN_BASE_URL: &str = "https://www.aladin.co.kr/ttb/api";
const API_VERSION: &str = "20131101";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AladinResponse {
    #[serde(default)]
    item: Vec<AladinItem>,
    error_code: Option<i64>,
    error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AladinItem {
    #[serde(default)]
    title: String,
    link: Option<String>,
    #[serde(default)]
    author: String,
    pub_date: Option<String>,
    isbn: Option<String>,
    isbn13: Option<String>,
    cover: Option<String>,
    publisher: Option<String>,
    category_name: Option<String>,
    /// `{}` or `{"itemPage": 320, ...}` depending on OptResult
    sub_info: Option<Value>,
}

impl AladinItem {
    fn lookup_id(&self) -> Option<(&'static str, String)> {
        if let Some(isbn13) = non_empty(self.isbn13.clone()) {
            return Some(("ISBN13", isbn13));
        }
        non_empty(self.isbn.clone()).map(|isbn| ("ISBN", isbn))
    }

    fn item_page(&self) -> Option<u32> {
        self.sub_info
            .as_ref()
            .and_then(|info| info.get("itemPage"))
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }
}

/// Decode an Aladin `output=js` body.
///
/// Some responses end with `;` or contain `\'` escapes, neither of which
/// is valid JSON.
fn parse_response(body: &str) -> Result<AladinResponse, ProviderError> {
    let trimmed = body.trim().trim_end_matches(';');
    let response: AladinResponse = match serde_json::from_str(trimmed) {
        Ok(response) => response,
        Err(_) => serde_json::from_str(&trimmed.replace("\\'", "'"))
            .map_err(|e| ProviderError::Parse(e.to_string()))?,
    };

    if let Some(code) = response.error_code {
        let message = response.error_message.unwrap_or_default();
        return Err(ProviderError::Rejected(format!("Aladin error {}: {}", code, message)));
    }
    Ok(response)
}

fn to_catalog_item(hit: AladinItem, category_path: &str, item_page: u32) -> CatalogItem {
    let taxonomy = normalize_category_path(category_path);
    CatalogItem {
        authors: parse_authors(&hit.author),
        publisher: non_empty(hit.publisher),
        thumbnail: non_empty(hit.cover),
        isbn: non_empty(hit.isbn13).or_else(|| non_empty(hit.isbn)),
        published_date: non_empty(hit.pub_date),
        url: non_empty(hit.link),
        genres: taxonomy.genres,
        country: taxonomy.country,
        item_page: Some(item_page),
        ..CatalogItem::new(hit.title, MediaType::Book)
    }
}

/// Aladin catalog client
pub struct AladinClient {
    http: reqwest::Client,
    base_url: String,
    ttb_key: Option<String>,
    timeout: Duration,
}

impl AladinClient {
    pub fn new(http: reqwest::Client, ttb_key: Option<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: ALADIN_BASE_URL.to_string(),
            ttb_key,
            timeout,
        }
    }

    /// Point the client at another host (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.ttb_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("Aladin TTB key"))
    }

    async fn item_search(
        &self,
        key: &str,
        query: &str,
        target: SearchTarget,
        max_results: usize,
    ) -> Result<AladinResponse, ProviderError> {
        let search_target = match target {
            SearchTarget::Book => "Book",
            SearchTarget::EBook => "eBook",
        };
        let max_results = max_results.to_string();

        debug!(query, search_target, "Aladin ItemSearch");
        let request = self
            .http
            .get(format!("{}/ItemSearch.aspx", self.base_url))
            .query(&[
                ("ttbkey", key),
                ("Query", query),
                ("QueryType", "Keyword"),
                ("MaxResults", max_results.as_str()),
                ("start", "1"),
                ("SearchTarget", search_target),
                ("Cover", "Big"),
                ("output", "js"),
                ("Version", API_VERSION),
            ]);
        let body = fetch_text(request, self.timeout).await?;
        parse_response(&body)
    }

    async fn item_lookup(
        &self,
        key: &str,
        id_type: &str,
        id: &str,
    ) -> Result<Option<AladinItem>, ProviderError> {
        let request = self
            .http
            .get(format!("{}/ItemLookUp.aspx", self.base_url))
            .query(&[
                ("ttbkey", key),
                ("ItemIdType", id_type),
                ("ItemId", id),
                ("output", "js"),
                ("Version", API_VERSION),
                ("OptResult", "packing"),
            ]);
        let body = fetch_text(request, self.timeout).await?;
        Ok(parse_response(&body)?.item.into_iter().next())
    }

    /// Complete one search hit with page count and detail category
    async fn complete(&self, key: &str, hit: AladinItem) -> CatalogItem {
        let fallback_category = hit.category_name.clone().unwrap_or_default();

        let Some((id_type, id)) = hit.lookup_id() else {
            return to_catalog_item(hit, &fallback_category, 0);
        };

        match self.item_lookup(key, id_type, &id).await {
            Ok(Some(detail)) => {
                let category = non_empty(detail.category_name.clone()).unwrap_or(fallback_category);
                let item_page = detail.item_page().unwrap_or(0);
                to_catalog_item(hit, &category, item_page)
            }
            Ok(None) => to_catalog_item(hit, &fallback_category, 0),
            Err(e) => {
                warn!(isbn = %id, error = %e, "Aladin lookup failed, using search hit");
                to_catalog_item(hit, &fallback_category, 0)
            }
        }
    }
}

#[async_trait]
impl BookProvider for AladinClient {
    fn name(&self) -> &'static str {
        "aladin"
    }

    fn is_configured(&self) -> bool {
        self.ttb_key.is_some()
    }

    async fn search(
        &self,
        query: &str,
        target: SearchTarget,
    ) -> Result<Vec<CatalogItem>, ProviderError> {
        let key = self.key()?;
        let response = self.item_search(key, query, target, SEARCH_RESULTS).await?;

        let items = join_all(
            response
                .item
                .into_iter()
                .take(SEARCH_RESULTS)
                .map(|hit| self.complete(key, hit)),
        )
        .await;

        info!(query, count = items.len(), "Aladin search complete");
        Ok(items)
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let key = self.key()?;
        let response = self
            .item_search(key, query, SearchTarget::Book, SUGGEST_RESULTS)
            .await?;

        Ok(response
            .item
            .into_iter()
            .take(SUGGEST_RESULTS)
            .map(|hit| Suggestion {
                year: hit.pub_date.as_deref().and_then(leading_year).map(String::from),
                author: parse_authors(&hit.author).into_iter().next(),
                title: hit.title,
            })
            .collect())
    }
}
