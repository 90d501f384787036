//! Destination store endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use shelflog_common::config::SchemaMode;
use shelflog_common::{Annotations, CatalogItem};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::notion::{self, DuplicateCheck, NotionError};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TenseOptionsResponse {
    pub options: Vec<String>,
}

/// GET /api/tense-options
///
/// Any failure yields an empty list; the client then offers no tense.
pub async fn tense_options(State(state): State<AppState>) -> Json<TenseOptionsResponse> {
    let tense_property = &state.config.notion.properties.tense;
    let options = match state.notion.retrieve_database().await {
        Ok(schema) => notion::tense_options(&schema, tense_property),
        Err(e) => {
            warn!(error = %e, "Tense options unavailable");
            Vec::new()
        }
    };
    Json(TenseOptionsResponse { options })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRequest {
    pub title: Option<String>,
    pub published_date: Option<String>,
}

/// POST /api/check-duplicate
pub async fn check_duplicate(
    State(state): State<AppState>,
    request: Result<Json<DuplicateRequest>, JsonRejection>,
) -> ApiResult<Json<DuplicateCheck>> {
    let Json(request) = request?;
    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;

    let check = notion::check_duplicate(
        &state.notion,
        &state.config.notion.properties,
        title,
        request.published_date.as_deref(),
    )
    .await;
    Ok(Json(check))
}

/// Save request: a catalog item plus the user's annotations
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    #[serde(flatten)]
    pub item: CatalogItem,
    #[serde(flatten)]
    pub annotations: Annotations,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResponse {
    pub success: bool,
    pub page_id: String,
    pub url: Option<String>,
}

/// Mirror a Notion rejection, prefixed with what was being attempted
fn notion_failure(context: &str, e: NotionError) -> ApiError {
    match e {
        NotionError::Api { status, body } => ApiError::Upstream {
            status,
            message: format!("{}: {}", context, body),
        },
        other => other.into(),
    }
}

/// POST /api/add-to-notion
pub async fn add_to_notion(
    State(state): State<AppState>,
    request: Result<Json<AddRequest>, JsonRejection>,
) -> ApiResult<Json<AddResponse>> {
    let Json(AddRequest { item, annotations }) = request?;
    if item.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    let settings = &state.config.notion;
    let database_id = state.notion.database_id()?;

    let page = match settings.schema_mode {
        SchemaMode::Fixed => notion::build_entry(
            &item,
            &annotations,
            &settings.properties,
            database_id,
            Local::now().date_naive(),
        ),
        SchemaMode::Discover => {
            let schema = state
                .notion
                .retrieve_database()
                .await
                .map_err(|e| notion_failure("Notion database lookup failed", e))?;
            notion::build_adaptive_entry(&schema, &item, &annotations, &settings.properties, database_id)
        }
    };

    let created = state
        .notion
        .create_page(&page)
        .await
        .map_err(|e| notion_failure("Notion page creation failed", e))?;

    info!(page_id = %created.id, title = %item.title, "Saved to Notion");
    Ok(Json(AddResponse {
        success: true,
        page_id: created.id,
        url: created.url,
    }))
}
