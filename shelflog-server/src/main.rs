//! shelflog-server - catalog search and Notion bookshelf service
//!
//! Settings resolve from command line / environment, then the TOML config
//! file, then compiled defaults.

use anyhow::{Context, Result};
use clap::Parser;
use shelflog_common::config::{load_config_file, ConfigOverrides, ServiceConfig};
use shelflog_server::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shelflog-server", version, about = "Catalog search and Notion bookshelf service")]
struct Args {
    /// TOML config file (default: <config_dir>/shelflog/config.toml)
    #[arg(long, env = "SHELFLOG_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(long, env = "SHELFLOG_BIND")]
    bind: Option<String>,

    /// Directory served for paths outside /api
    #[arg(long, env = "SHELFLOG_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    #[arg(long, env = "ALADIN_TTB_KEY", hide_env_values = true)]
    aladin_ttb_key: Option<String>,

    #[arg(long, env = "KAKAO_REST_API_KEY", hide_env_values = true)]
    kakao_rest_api_key: Option<String>,

    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    tmdb_api_key: Option<String>,

    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
    notion_token: Option<String>,

    #[arg(long, env = "NOTION_DATABASE_ID")]
    notion_database_id: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            bind_address: self.bind.clone(),
            aladin_ttb_key: self.aladin_ttb_key.clone(),
            kakao_rest_api_key: self.kakao_rest_api_key.clone(),
            tmdb_api_key: self.tmdb_api_key.clone(),
            notion_token: self.notion_token.clone(),
            notion_database_id: self.notion_database_id.clone(),
            static_dir: self.static_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The log level lives in the config file, so read it before tracing starts
    let toml_config = load_config_file(args.config.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&toml_config.logging.level))
        .context("Invalid logging.level")?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!(
        "Starting shelflog-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ServiceConfig::resolve(args.overrides(), toml_config)?;
    let addr = format!("{}:{}", config.bind_address, config.port);
    info!("Static files: {}", config.static_dir.display());

    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("shelflog-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
