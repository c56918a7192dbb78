use serde::Deserialize;

use crate::config::settings::SettingsConfig;
use crate::utils::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_GOOGLE_BOOKS_URL, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_TOKEN_EXPIRY_MINUTES,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub google_books: GoogleBooksConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// ================================
/// Jwt
/// ================================
/// `key`, `issuer` and `audience` stay optional here: a missing value is only
/// fatal when a token is issued or validated.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub key: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    #[serde(default = "default_token_expiry_minutes")]
    pub expiry_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            key: None,
            issuer: None,
            audience: None,
            expiry_minutes: default_token_expiry_minutes(),
        }
    }
}

/// ================================
/// Google Books upstream
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct GoogleBooksConfig {
    #[serde(default = "default_google_books_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// `langRestrict`
    pub language: Option<String>,
    /// `maxResults`, clamped to the provider limit
    pub max_results: Option<u32>,
    /// `printType`
    pub print_type: Option<String>,
    /// `orderBy`
    pub order_by: Option<String>,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: default_google_books_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            language: None,
            max_results: None,
            print_type: None,
            order_by: None,
        }
    }
}

/// ================================
/// Cache
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: default_cache_ttl_seconds() }
    }
}

fn default_token_expiry_minutes() -> i64 {
    DEFAULT_TOKEN_EXPIRY_MINUTES
}

fn default_google_books_url() -> String {
    DEFAULT_GOOGLE_BOOKS_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}
