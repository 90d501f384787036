//! Liveness plus a summary of which upstreams have credentials

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use shelflog_common::config::ServiceConfig;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub integrations: Integrations,
}

/// Configured state of each upstream; Yes24 needs no credential
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Integrations {
    pub aladin: bool,
    pub kakao: bool,
    pub tmdb: bool,
    pub notion: bool,
}

impl Integrations {
    fn of(config: &ServiceConfig) -> Self {
        Self {
            aladin: config.providers.aladin_ttb_key.is_some(),
            kakao: config.providers.kakao_rest_api_key.is_some(),
            tmdb: config.providers.tmdb_api_key.is_some(),
            notion: config.notion.credentials().is_some(),
        }
    }
}

/// GET /health
///
/// Always 200 while the process serves requests; a missing credential
/// shows up as `false` rather than an unhealthy status.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        integrations: Integrations::of(&state.config),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrations_follow_credentials() {
        let mut config = ServiceConfig::default();
        config.providers.aladin_ttb_key = Some("ttb".to_string());
        config.notion.token = Some("secret".to_string());

        // Notion needs the database id as well
        assert_eq!(
            Integrations::of(&config),
            Integrations {
                aladin: true,
                kakao: false,
                tmdb: false,
                notion: false,
            }
        );
    }
}
