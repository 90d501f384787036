//! Autocomplete endpoint; never fails, at worst returns no suggestions

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shelflog_common::{MediaType, Suggestion};
use tracing::{debug, warn};

use super::search::within;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    pub query: Option<String>,
    /// `book` (default), `ebook`, `movie` or `drama`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
}

/// GET /api/suggest?query=&type=
pub async fn suggest(
    State(state): State<AppState>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> Json<SuggestResponse> {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Unreadable suggest parameters");
            SuggestParams::default()
        }
    };
    let query = params.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Json(SuggestResponse {
            suggestions: Vec::new(),
        });
    }

    let media_type = match params.kind.as_deref() {
        None => Some(MediaType::Book),
        Some(raw) => MediaType::from_param(raw),
    };

    let limit = state.config.request_timeout;
    let suggestions = match media_type {
        Some(MediaType::Book) => within(limit, async { Ok(state.books.suggest(query).await) }).await,
        Some(screen) => within(limit, state.tmdb.suggest(query, screen)).await,
        None => {
            debug!(kind = ?params.kind, "Unknown suggest type");
            Ok(Vec::new())
        }
    };

    let suggestions = suggestions.unwrap_or_else(|e| {
        warn!(query, error = %e, "Suggestions unavailable");
        Vec::new()
    });
    Json(SuggestResponse { suggestions })
}
