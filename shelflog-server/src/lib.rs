//! shelflog-server library
//!
//! Catalog search (books, movies, dramas) and saving to a Notion database.

use axum::routing::{get, post};
use axum::Router;
use shelflog_common::config::ServiceConfig;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod notion;
pub mod providers;

use notion::NotionClient;
use providers::{BookCatalog, ProviderError, TmdbClient};

/// Application state shared across HTTP handlers, read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub books: Arc<BookCatalog>,
    pub tmdb: Arc<TmdbClient>,
    pub notion: Arc<NotionClient>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        books: BookCatalog,
        tmdb: TmdbClient,
        notion: NotionClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            books: Arc::new(books),
            tmdb: Arc::new(tmdb),
            notion: Arc::new(notion),
        }
    }

    /// Build every client against its production endpoint
    pub fn from_config(config: ServiceConfig) -> Result<Self, ProviderError> {
        let http = providers::http_client(config.request_timeout)?;

        let books = BookCatalog::from_config(&http, &config);
        let tmdb = TmdbClient::new(
            http.clone(),
            config.providers.tmdb_api_key.clone(),
            config.upstream_timeout(),
        );
        // Saves are not part of a search chain and get the whole budget
        let notion = NotionClient::new(
            http,
            config.notion.token.clone(),
            config.notion.database_id.clone(),
            config.request_timeout,
        );

        Ok(Self::new(config, books, tmdb, notion))
    }
}

/// Build application router
///
/// Unmatched paths are served from the static directory.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/api/search", get(api::search_books))
        .route("/api/search-ebook", get(api::search_ebooks))
        .route("/api/search-movie", get(api::search_movies))
        .route("/api/search-drama", get(api::search_dramas))
        .route("/api/suggest", get(api::suggest))
        .route("/api/tense-options", get(api::tense_options))
        .route("/api/check-duplicate", post(api::check_duplicate))
        .route("/api/add-to-notion", post(api::add_to_notion))
        .merge(api::health_routes())
        .fallback_service(static_files)
        .with_state(state)
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
