//! Configuration loading and resolution
//!
//! Every setting resolves with the priority:
//! 1. Command-line argument or environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! Blank strings count as unset at every tier.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_STATIC_DIR: &str = "public";
/// Sequential upstream calls one request budget must cover
pub const UPSTREAM_CALLS_PER_REQUEST: u32 = 4;
const CONFIG_DIR_NAME: &str = "shelflog";
const CONFIG_FILE_NAME: &str = "config.toml";

/// How the Notion page payload is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Write the configured property names with fixed types
    #[default]
    Fixed,
    /// Read the database schema and match properties by alias
    Discover,
}

/// Destination property names used in fixed schema mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyNames {
    pub title: String,
    pub category: String,
    pub date: String,
    pub authors: String,
    pub country: String,
    pub genres: String,
    /// Page count, runtime or episode count
    pub numeric: String,
    pub rating: String,
    pub tense: String,
    pub cover: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "이름".to_string(),
            category: "분류".to_string(),
            date: "날짜".to_string(),
            authors: "작가/감독".to_string(),
            country: "국가".to_string(),
            genres: "장르".to_string(),
            numeric: "러닝타임".to_string(),
            rating: "별점".to_string(),
            tense: "시제".to_string(),
            cover: "Files & media".to_string(),
        }
    }
}

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[notion]` section of the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionToml {
    pub token: Option<String>,
    pub database_id: Option<String>,
    pub schema_mode: Option<SchemaMode>,
    pub properties: PropertyNames,
}

/// On-disk configuration file; every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub aladin_ttb_key: Option<String>,
    pub kakao_rest_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub static_dir: Option<PathBuf>,
    pub notion: NotionToml,
    pub logging: LoggingConfig,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub aladin_ttb_key: Option<String>,
    pub kakao_rest_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub notion_token: Option<String>,
    pub notion_database_id: Option<String>,
    pub static_dir: Option<PathBuf>,
}

/// Catalog provider credentials
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub aladin_ttb_key: Option<String>,
    pub kakao_rest_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,
}

/// Destination store settings
#[derive(Debug, Clone, Default)]
pub struct NotionConfig {
    pub token: Option<String>,
    pub database_id: Option<String>,
    pub schema_mode: SchemaMode,
    pub properties: PropertyNames,
}

impl NotionConfig {
    /// Token and database id, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.token.as_deref()?, self.database_id.as_deref()?))
    }
}

/// Fully resolved service configuration, read-only after startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub bind_address: String,
    pub providers: ProviderKeys,
    pub notion: NotionConfig,
    pub request_timeout: Duration,
    pub static_dir: PathBuf,
    pub logging: LoggingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            providers: ProviderKeys::default(),
            notion: NotionConfig::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Timeout for one upstream call.
    ///
    /// A search chains a catalog call, its enrichment calls and the next
    /// provider's attempt, all inside `request_timeout`.
    pub fn upstream_timeout(&self) -> Duration {
        self.request_timeout / UPSTREAM_CALLS_PER_REQUEST
    }

    /// Merge command-line/environment overrides over the TOML file
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Result<Self> {
        let request_timeout_secs = toml
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let port = overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT);
        if port == 0 {
            return Err(Error::Config("port must be between 1 and 65535".to_string()));
        }

        let config = Self {
            port,
            bind_address: pick("bind_address", overrides.bind_address, toml.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            providers: ProviderKeys {
                aladin_ttb_key: pick("aladin_ttb_key", overrides.aladin_ttb_key, toml.aladin_ttb_key),
                kakao_rest_api_key: pick(
                    "kakao_rest_api_key",
                    overrides.kakao_rest_api_key,
                    toml.kakao_rest_api_key,
                ),
                tmdb_api_key: pick("tmdb_api_key", overrides.tmdb_api_key, toml.tmdb_api_key),
            },
            notion: NotionConfig {
                token: pick("notion.token", overrides.notion_token, toml.notion.token),
                database_id: pick(
                    "notion.database_id",
                    overrides.notion_database_id,
                    toml.notion.database_id,
                ),
                schema_mode: toml.notion.schema_mode.unwrap_or_default(),
                properties: toml.notion.properties,
            },
            request_timeout: Duration::from_secs(request_timeout_secs),
            static_dir: overrides
                .static_dir
                .or(toml.static_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            logging: toml.logging,
        };

        config.warn_missing();
        Ok(config)
    }

    fn warn_missing(&self) {
        if self.providers.aladin_ttb_key.is_none() {
            warn!("Aladin TTB key not configured; book search falls back to Kakao/Yes24");
        }
        if self.providers.tmdb_api_key.is_none() {
            warn!("TMDB API key not configured; movie and drama search disabled");
        }
        if self.notion.credentials().is_none() {
            warn!("Notion token or database id not configured; saving disabled");
        }
    }
}

/// Validate a configured value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Pick the highest-priority valid value, logging where it came from
fn pick(name: &str, cli_or_env: Option<String>, toml: Option<String>) -> Option<String> {
    if let Some(value) = cli_or_env.filter(|v| is_valid_key(v)) {
        debug!(setting = name, "Loaded from command line or environment");
        return Some(value.trim().to_string());
    }
    if let Some(value) = toml.filter(|v| is_valid_key(v)) {
        debug!(setting = name, "Loaded from TOML config");
        return Some(value.trim().to_string());
    }
    None
}

/// Default config file location: `<config_dir>/shelflog/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the config file.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and an empty config otherwise.
pub fn load_config_file(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)?;
        info!("Loaded config file {}", path.display());
        return Ok(config);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            info!("Loaded config file {}", path.display());
            Ok(config)
        }
        _ => {
            debug!("No config file found, using environment and defaults");
            Ok(TomlConfig::default())
        }
    }
}
