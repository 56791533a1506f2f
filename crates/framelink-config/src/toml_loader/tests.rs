//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_framelink_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, framelink_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[host]
domain = "meet.example.org"

[host.options]
room = "weekly-sync"
video = true
token = "abc123"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.host.domain, "meet.example.org");
    assert_eq!(config.host.options.room, "weekly-sync");
    assert!(config.host.options.video);
    assert_eq!(config.host.options.token.as_deref(), Some("abc123"));
    // Defaults preserved
    assert_eq!(config.host.scheme, "https");
    assert_eq!(config.host.options.name, "guest");
    assert_eq!(config.embed.screen_hint_delay_ms, 50);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, framelink_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_returns_parsed_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[embed]
join_poll_ms = 1
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.embed.join_poll_ms, 1);
}

#[test]
fn wrong_field_type_is_parse_error() {
    let err = load_from_str("[host.options]\naudio = \"yes\"\n").unwrap_err();
    assert!(err.to_string().contains("failed to parse TOML"));
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("framelink").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.host.domain, "p2p.mirotalk.com");
    assert_eq!(config.host.options.room, "default-room");
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;

    let config = load_from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    // Depends on the environment exposing a config directory.
    if std::env::var_os(CONFIG_PATH_ENV).is_some() {
        return;
    }
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("framelink"));
        assert!(path_str.ends_with("config.toml"));
    }
}
