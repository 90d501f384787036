//! Shared fixtures for HTTP API tests
//!
//! Every external service is served by one mockito server; the clients are
//! pointed at it through their base URL overrides.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use shelflog_common::config::{NotionConfig, ProviderKeys, SchemaMode, ServiceConfig};
use shelflog_server::notion::NotionClient;
use shelflog_server::providers::{
    AladinClient, BookCatalog, BookProvider, KakaoClient, TmdbClient, Yes24Client,
};
use shelflog_server::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DATABASE_ID: &str = "db123";
pub const NOTION_TOKEN: &str = "secret_test";

/// Which credentials the test service has
#[derive(Debug, Clone)]
pub struct Keys {
    pub aladin: bool,
    pub kakao: bool,
    pub tmdb: bool,
    pub notion: bool,
}

impl Default for Keys {
    fn default() -> Self {
        Self {
            aladin: true,
            kakao: false,
            tmdb: true,
            notion: true,
        }
    }
}

pub fn test_config(keys: &Keys, schema_mode: SchemaMode, static_dir: PathBuf) -> ServiceConfig {
    let key = |enabled: bool, value: &str| enabled.then(|| value.to_string());
    ServiceConfig {
        providers: ProviderKeys {
            aladin_ttb_key: key(keys.aladin, "ttb-test"),
            kakao_rest_api_key: key(keys.kakao, "kakao-test"),
            tmdb_api_key: key(keys.tmdb, "tmdb-test"),
        },
        notion: NotionConfig {
            token: key(keys.notion, NOTION_TOKEN),
            database_id: key(keys.notion, DATABASE_ID),
            schema_mode,
            ..NotionConfig::default()
        },
        request_timeout: Duration::from_secs(5),
        static_dir,
        ..ServiceConfig::default()
    }
}

/// App state whose clients all talk to `base_url`
pub fn test_state(base_url: &str, config: ServiceConfig) -> AppState {
    let http = reqwest::Client::new();
    let timeout = config.upstream_timeout();

    let providers: Vec<Arc<dyn BookProvider>> = vec![
        Arc::new(
            AladinClient::new(http.clone(), config.providers.aladin_ttb_key.clone(), timeout)
                .with_base_url(base_url),
        ),
        Arc::new(
            KakaoClient::new(http.clone(), config.providers.kakao_rest_api_key.clone(), timeout)
                .with_base_url(base_url),
        ),
        Arc::new(Yes24Client::new(http.clone(), timeout).with_base_url(base_url)),
    ];
    let tmdb = TmdbClient::new(http.clone(), config.providers.tmdb_api_key.clone(), timeout)
        .with_base_url(base_url);
    let notion = NotionClient::new(
        http,
        config.notion.token.clone(),
        config.notion.database_id.clone(),
        config.request_timeout,
    )
    .with_base_url(base_url);

    AppState::new(config, BookCatalog::new(providers), tmdb, notion)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Extract JSON body from response
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Percent-encode a query value for request URIs
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Serve `router` on an ephemeral port and return its base URL.
///
/// Used where an upstream must stall, which mockito cannot express.
pub async fn spawn_upstream(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
