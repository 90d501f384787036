//! Catalog search endpoints
//!
//! `/api/search` and `/api/search-ebook` run the book provider chain;
//! `/api/search-movie` and `/api/search-drama` query TMDB. The whole
//! search, reformulated retry included, runs under the request timeout.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shelflog_common::query;
use shelflog_common::{CatalogItem, MediaType};
use std::future::Future;
use std::time::Duration;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::providers::{ProviderError, SearchTarget};
use crate::AppState;

/// Query parameters shared by every search endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,

    /// Retry once with a spacing variant when nothing was found
    #[serde(default)]
    pub reformulate: bool,
}

impl SearchParams {
    fn required_query(&self) -> ApiResult<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ApiError::BadRequest("query parameter is required".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<CatalogItem>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<CatalogItem>,
}

/// Run `search` under `limit`, reporting expiry as a provider timeout
pub(crate) async fn within<T, F>(limit: Duration, search: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    tokio::time::timeout(limit, search)
        .await
        .unwrap_or(Err(ProviderError::Timeout(limit)))
}

async fn books(
    state: &AppState,
    query: &str,
    target: SearchTarget,
    reformulate: bool,
) -> Result<Vec<CatalogItem>, ProviderError> {
    let items = state.books.search(query, target).await?;
    if !items.is_empty() || !reformulate {
        return Ok(items);
    }
    match query::reformulate(query) {
        Some(variant) => {
            info!(query, variant = %variant, "No books found, retrying reformulated query");
            state.books.search(&variant, target).await
        }
        None => Ok(items),
    }
}

async fn screen(
    state: &AppState,
    query: &str,
    media_type: MediaType,
    reformulate: bool,
) -> Result<Vec<CatalogItem>, ProviderError> {
    let items = state.tmdb.search(query, media_type).await?;
    if !items.is_empty() || !reformulate {
        return Ok(items);
    }
    match query::reformulate(query) {
        Some(variant) => {
            info!(query, variant = %variant, "No titles found, retrying reformulated query");
            state.tmdb.search(&variant, media_type).await
        }
        None => Ok(items),
    }
}

async fn search_book_target(
    state: AppState,
    params: SearchParams,
    target: SearchTarget,
) -> ApiResult<Json<BooksResponse>> {
    let query = params.required_query()?;
    let limit = state.config.request_timeout;
    let books = within(limit, books(&state, query, target, params.reformulate))
        .await
        .map_err(|e| ApiError::provider("Book search failed", e))?;
    Ok(Json(BooksResponse { books }))
}

async fn search_screen(
    state: AppState,
    params: SearchParams,
    media_type: MediaType,
) -> ApiResult<Json<ItemsResponse>> {
    let query = params.required_query()?;
    let limit = state.config.request_timeout;
    let context = match media_type {
        MediaType::Drama => "Drama search failed",
        _ => "Movie search failed",
    };
    let items = within(limit, screen(&state, query, media_type, params.reformulate))
        .await
        .map_err(|e| ApiError::provider(context, e))?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /api/search?query=
pub async fn search_books(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<BooksResponse>> {
    let Query(params) = params?;
    search_book_target(state, params, SearchTarget::Book).await
}

/// GET /api/search-ebook?query=
pub async fn search_ebooks(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<BooksResponse>> {
    let Query(params) = params?;
    search_book_target(state, params, SearchTarget::EBook).await
}

/// GET /api/search-movie?query=
pub async fn search_movies(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<ItemsResponse>> {
    let Query(params) = params?;
    search_screen(state, params, MediaType::Movie).await
}

/// GET /api/search-drama?query=
pub async fn search_dramas(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<ItemsResponse>> {
    let Query(params) = params?;
    search_screen(state, params, MediaType::Drama).await
}
