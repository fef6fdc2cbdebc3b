// tests/config_loading.rs

//! Coordinator configuration: defaults, TOML loading, and validation.

use std::io::Write;
use std::time::Duration;

use fandag::config::loader::{load_and_validate, load_from_path};
use fandag::config::{CoordinatorConfig, RawCoordinatorConfig};
use fandag::errors::FandagError;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_match_the_documented_budgets() {
    let config = CoordinatorConfig::default();

    assert_eq!(config.fanout.lock_wait, Duration::from_secs(2));
    assert_eq!(config.fanout.lock_ttl, Duration::from_secs(10));
    assert_eq!(config.fanout.retry_attempts, 5);
    assert_eq!(config.fanout.retry_backoff, Duration::from_secs(5));
}

#[test]
fn empty_file_yields_defaults() {
    let file = write_config("");
    let config = load_and_validate(file.path()).expect("empty config is valid");

    assert_eq!(config.fanout.retry_attempts, 5);
    assert_eq!(config.fanout.lock_wait, Duration::from_secs(2));
}

#[test]
fn partial_fanout_section_keeps_remaining_defaults() {
    let file = write_config(
        r#"
[fanout]
retry_attempts = 2
retry_backoff_ms = 100
"#,
    );

    let config = load_and_validate(file.path()).expect("partial config is valid");
    assert_eq!(config.fanout.retry_attempts, 2);
    assert_eq!(config.fanout.retry_backoff, Duration::from_millis(100));
    // Untouched keys fall back to defaults.
    assert_eq!(config.fanout.lock_wait, Duration::from_secs(2));
    assert_eq!(config.fanout.lock_ttl, Duration::from_secs(10));
}

#[test]
fn zero_retry_attempts_is_rejected() {
    let file = write_config(
        r#"
[fanout]
retry_attempts = 0
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, FandagError::ConfigError(_)));
}

#[test]
fn zero_lock_ttl_is_rejected() {
    let raw: RawCoordinatorConfig = toml::from_str(
        r#"
[fanout]
lock_ttl_ms = 0
"#,
    )
    .expect("syntactically valid");

    let err = CoordinatorConfig::try_from(raw).unwrap_err();
    assert!(matches!(err, FandagError::ConfigError(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_from_path("definitely/not/here/Fandag.toml").unwrap_err();
    assert!(matches!(err, FandagError::IoError(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[fanout\nretry_attempts = ");
    let err = load_from_path(file.path()).unwrap_err();
    assert!(matches!(err, FandagError::TomlError(_)));
}
