//! Tests for loading FlowConfig from TOML.

use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use liar_flow::FlowConfig;

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("liar_flow.toml");
    fs::write(
        &path,
        r#"base_url = "http://10.0.0.5:20021/api/v1/"
poll_attempts = 4
"#,
    )
    .expect("Failed to write TOML");

    let config = FlowConfig::from_file(&path).expect("Load failed");
    assert_eq!(config.base_url(), "http://10.0.0.5:20021/api/v1/");
    assert_eq!(*config.poll_attempts(), 4);
    assert_eq!(config.poll_interval(), Duration::from_millis(800));
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
    assert_eq!(config.default_words().len(), 5);
}

#[test]
fn test_full_file_overrides_everything() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("full.toml");
    fs::write(
        &path,
        r#"base_url = "http://game.test/api/v1"
request_timeout_ms = 2000
poll_interval_ms = 100
poll_attempts = 2
default_subject_name = "Animals"
default_words = ["cat", "dog"]
defense_text = "not me"
skill_url_template = "http://data.test/{character}"
"#,
    )
    .expect("Failed to write TOML");

    let config = FlowConfig::from_file(&path).expect("Load failed");
    assert_eq!(config.default_subject_name(), "Animals");
    assert_eq!(config.default_words(), &vec!["cat".to_string(), "dog".to_string()]);
    assert_eq!(config.defense_text(), "not me");
    assert_eq!(config.skill_url_template(), "http://data.test/{character}");
    assert_eq!(config.request_timeout(), Duration::from_secs(2));
}

#[test]
fn test_invalid_toml_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "poll_attempts = \"many\"").expect("Write failed");

    assert!(FlowConfig::from_file(&path).is_err());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = FlowConfig::load_or_default(dir.path().join("absent.toml")).expect("Load failed");
    assert_eq!(config, FlowConfig::default());
}

#[test]
fn test_missing_file_is_error_for_from_file() {
    let result = FlowConfig::from_file("/this/path/does/not/exist/liar_flow.toml");
    assert!(result.is_err());
}
