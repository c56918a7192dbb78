// YAML config: env expansion, defaults, validation.

use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use crate::config::proc_loader::{expand_env_vars, file_to_config, parse_config};
use crate::config::settings::LogFormat;
use crate::utils::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_GOOGLE_BOOKS_URL, DEFAULT_TOKEN_EXPIRY_MINUTES, MAX_CACHE_TTL_SECS,
    MAX_TOKEN_EXPIRY_MINUTES,
};
use crate::utils::logging::{resolve_logging_config, LogLevel};

const FULL_CONFIG: &str = r#"
settings:
  server:
    host: 127.0.0.1
    port: "8088"
  logging:
    level: debug
    format: json
  metrics:
    path: /metrics
    is_enabled: true
jwt:
  key: ${BOOK_GATEWAY_TEST_JWT_KEY}
  issuer: shelf-api
  audience: shelf-web
  expiry_minutes: 120
google_books:
  base_url: https://www.googleapis.com/books/v1
  api_key: ${BOOK_GATEWAY_TEST_API_KEY:}
  timeout_ms: 5000
  language: en
  max_results: 20
cache:
  ttl_seconds: 60
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[tokio::test]
#[serial]
async fn file_config_expands_env_and_drops_empty_values() {
    std::env::set_var("BOOK_GATEWAY_TEST_JWT_KEY", "from-env-secret");
    std::env::remove_var("BOOK_GATEWAY_TEST_API_KEY");
    let file = write_config(FULL_CONFIG);

    let config = file_to_config(file.path()).await.expect("config should load");
    assert_eq!(config.jwt.key.as_deref(), Some("from-env-secret"));
    assert_eq!(config.jwt.expiry_minutes, 120);
    assert_eq!(config.google_books.api_key, None);
    assert_eq!(config.google_books.language.as_deref(), Some("en"));
    assert_eq!(config.cache.ttl_seconds, 60);
    assert_eq!(config.settings.server.port, "8088");
    assert_eq!(config.settings.logging.unwrap().format, LogFormat::Json);

    std::env::remove_var("BOOK_GATEWAY_TEST_JWT_KEY");
}

#[tokio::test]
#[serial]
async fn unset_jwt_key_loads_but_stays_absent() {
    std::env::remove_var("BOOK_GATEWAY_TEST_JWT_KEY");
    let config = file_to_config(write_config(FULL_CONFIG).path()).await.unwrap();
    assert_eq!(config.jwt.key, None);
}

#[tokio::test]
async fn minimal_config_gets_defaults() {
    let config = parse_config("settings: {}\n".to_owned()).await.expect("minimal config");

    assert_eq!(config.google_books.base_url, DEFAULT_GOOGLE_BOOKS_URL);
    assert_eq!(config.cache.ttl_seconds, DEFAULT_CACHE_TTL_SECS);
    assert_eq!(config.jwt.expiry_minutes, DEFAULT_TOKEN_EXPIRY_MINUTES);
    assert!(!config.settings.metrics.is_enabled);
    let logging = config.settings.logging.as_ref().unwrap();
    assert_eq!(logging.level, "info");
    assert_eq!(logging.format, LogFormat::Compact);
}

#[tokio::test]
async fn invalid_values_are_reported_together() {
    let content = r#"
settings:
  server: { host: "", port: "not-a-port" }
google_books:
  base_url: "::nope::"
  timeout_ms: 0
cache:
  ttl_seconds: 0
"#;
    let err = parse_config(content.to_owned()).await.unwrap_err().to_string();
    assert!(err.contains("config is not valid"), "{err}");
    assert!(err.contains("settings.server.host"), "{err}");
    assert!(err.contains("settings.server.port"), "{err}");
    assert!(err.contains("google_books.base_url"), "{err}");
    assert!(err.contains("google_books.timeout_ms"), "{err}");
    assert!(err.contains("cache.ttl_seconds"), "{err}");
}

#[tokio::test]
#[serial]
async fn shipped_config_loads_with_language_filter() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("book-gateway.yaml");
    let config = file_to_config(&path).await.expect("shipped config should load");
    assert_eq!(config.google_books.language.as_deref(), Some("en"));
    assert_eq!(config.google_books.max_results, Some(20));
    assert_eq!(config.cache.ttl_seconds, DEFAULT_CACHE_TTL_SECS);
}

#[tokio::test]
async fn oversized_ttl_and_expiry_are_rejected() {
    let content = r#"
settings: {}
jwt:
  expiry_minutes: 9223372036854775807
cache:
  ttl_seconds: 18446744073709551615
"#;
    let err = parse_config(content.to_owned()).await.unwrap_err().to_string();
    assert!(err.contains("jwt.expiry_minutes must be at most"), "{err}");
    assert!(err.contains("cache.ttl_seconds must be at most"), "{err}");

    let at_bounds = format!(
        "settings: {{}}\njwt: {{ expiry_minutes: {} }}\ncache: {{ ttl_seconds: {} }}\n",
        MAX_TOKEN_EXPIRY_MINUTES, MAX_CACHE_TTL_SECS
    );
    let config = parse_config(at_bounds).await.unwrap();
    assert_eq!(config.jwt.expiry_minutes, MAX_TOKEN_EXPIRY_MINUTES);
    assert_eq!(config.cache.ttl_seconds, MAX_CACHE_TTL_SECS);
}

#[tokio::test]
async fn cli_log_level_overrides_config() {
    let config = parse_config("settings: { logging: { level: warn, format: json } }\n".to_owned())
        .await
        .unwrap();

    let from_file = resolve_logging_config(&config, None);
    assert_eq!(from_file.level, "warn");

    let from_cli = resolve_logging_config(&config, Some(LogLevel::DEBUG));
    assert_eq!(from_cli.level, "debug");
    assert_eq!(from_cli.format, LogFormat::Json);
}

#[test]
#[serial]
fn env_expansion_uses_defaults() {
    std::env::remove_var("BOOK_GATEWAY_TEST_UNSET");
    let expanded = expand_env_vars("a: ${BOOK_GATEWAY_TEST_UNSET:fallback}\nb: ${BOOK_GATEWAY_TEST_UNSET}").unwrap();
    assert_eq!(expanded, "a: fallback\nb: ");
}
