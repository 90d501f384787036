//! Unit tests for configuration resolution
//!
//! Tests that manipulate XDG_CONFIG_HOME are marked with #[serial]
//! so they never race each other. XDG lookup only applies on Linux.

use serial_test::serial;
use shelflog_common::config::{
    is_valid_key, load_config_file, load_toml_config, ConfigOverrides, PropertyNames,
    SchemaMode, ServiceConfig, TomlConfig, DEFAULT_PORT,
};
use std::io::Write;
use std::time::Duration;

fn write_toml(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

// ============================================================================
// Resolution priority
// ============================================================================

#[test]
fn test_overrides_beat_toml() {
    let toml = TomlConfig {
        port: Some(4000),
        aladin_ttb_key: Some("toml-key".to_string()),
        ..Default::default()
    };
    let overrides = ConfigOverrides {
        port: Some(5000),
        aladin_ttb_key: Some("env-key".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(overrides, toml).unwrap();
    assert_eq!(config.port, 5000);
    assert_eq!(config.providers.aladin_ttb_key.as_deref(), Some("env-key"));
}

#[test]
fn test_toml_fallback_when_override_blank() {
    let toml = TomlConfig {
        tmdb_api_key: Some("toml-tmdb".to_string()),
        ..Default::default()
    };
    let overrides = ConfigOverrides {
        tmdb_api_key: Some("   ".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(overrides, toml).unwrap();
    assert_eq!(config.providers.tmdb_api_key.as_deref(), Some("toml-tmdb"));
}

#[test]
fn test_defaults_when_nothing_configured() {
    let config = ServiceConfig::resolve(ConfigOverrides::default(), TomlConfig::default()).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.bind_address, "127.0.0.1");
    assert_eq!(config.request_timeout, Duration::from_secs(15));
    assert_eq!(config.notion.schema_mode, SchemaMode::Fixed);
    assert_eq!(config.notion.properties, PropertyNames::default());
    assert!(config.notion.credentials().is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_zero_timeout_rejected() {
    let toml = TomlConfig {
        request_timeout_secs: Some(0),
        ..Default::default()
    };
    assert!(ServiceConfig::resolve(ConfigOverrides::default(), toml).is_err());
}

#[test]
fn test_upstream_timeout_is_a_slice_of_request_timeout() {
    let toml = TomlConfig {
        request_timeout_secs: Some(8),
        ..Default::default()
    };
    let config = ServiceConfig::resolve(ConfigOverrides::default(), toml).unwrap();
    assert_eq!(config.upstream_timeout(), Duration::from_secs(2));
    assert!(config.upstream_timeout() * 3 < config.request_timeout);
}

#[test]
fn test_notion_credentials_need_both_values() {
    let overrides = ConfigOverrides {
        notion_token: Some("secret".to_string()),
        ..Default::default()
    };
    let config = ServiceConfig::resolve(overrides, TomlConfig::default()).unwrap();
    assert!(config.notion.credentials().is_none());

    let overrides = ConfigOverrides {
        notion_token: Some("secret".to_string()),
        notion_database_id: Some("db".to_string()),
        ..Default::default()
    };
    let config = ServiceConfig::resolve(overrides, TomlConfig::default()).unwrap();
    assert_eq!(config.notion.credentials(), Some(("secret", "db")));
}

#[test]
fn test_is_valid_key() {
    assert!(is_valid_key("abc"));
    assert!(!is_valid_key(""));
    assert!(!is_valid_key(" \t\n"));
}

// ============================================================================
// TOML parsing
// ============================================================================

#[test]
fn test_toml_file_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_toml(
        &dir,
        "config.toml",
        r#"
port = 8080
request_timeout_secs = 5

[notion]
token = "secret_abc"
database_id = "0123"
schema_mode = "discover"

[notion.properties]
title = "Name"
tense = "Status"

[logging]
level = "debug"
"#,
    );

    let toml = load_toml_config(&path).unwrap();
    let config = ServiceConfig::resolve(ConfigOverrides::default(), toml).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    assert_eq!(config.notion.schema_mode, SchemaMode::Discover);
    assert_eq!(config.notion.properties.title, "Name");
    assert_eq!(config.notion.properties.tense, "Status");
    // Unlisted property names keep their defaults
    assert_eq!(config.notion.properties.genres, "장르");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_toml(&dir, "broken.toml", "port = \"not a number\"");
    let err = load_toml_config(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(load_config_file(Some(&missing)).is_err());
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_default_location_used_when_present() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("shelflog")).unwrap();
    write_toml(&dir, "shelflog/config.toml", "port = 9999\n");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let toml = load_config_file(None).unwrap();
    assert_eq!(toml.port, Some(9999));

    std::env::remove_var("XDG_CONFIG_HOME");
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_missing_default_location_is_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let toml = load_config_file(None).unwrap();
    assert!(toml.port.is_none());
    assert!(toml.notion.token.is_none());

    std::env::remove_var("XDG_CONFIG_HOME");
}
