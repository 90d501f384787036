//! HTTP API handlers

pub mod health;
pub mod notion;
pub mod search;
pub mod suggest;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;

pub use health::health_routes;
pub use notion::{add_to_notion, check_duplicate, tense_options};
pub use search::{search_books, search_dramas, search_ebooks, search_movies};
pub use suggest::suggest;

/// Response for a handler that panicked
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "Handler panicked");

    let body = Json(json!({
        "error": "Internal server error",
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
