//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Jwt key/issuer/audience are NOT required here, issuance fails on its own
//!   when they are missing.

use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::config::types::{CacheConfig, GoogleBooksConfig, JwtConfig, ServiceConfig};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{MAX_CACHE_TTL_SECS, MAX_TOKEN_EXPIRY_MINUTES};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_jwt(&cfg.jwt, &mut errors);
    validate_google_books(&cfg.google_books, &mut errors);
    validate_cache(&cfg.cache, &mut errors);

    if errors.is_empty() {
        info!("config validated");
        return Ok(());
    }

    let metrics = get_metrics().await;
    for err in errors.iter() {
        error!("config error: {}", err);
        metrics.config_validation_errors.inc();
    }
    Err(errors)
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' is not a valid port",
            settings.server.port
        ));
    }
    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }
    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
}

fn validate_jwt(jwt: &JwtConfig, errors: &mut Vec<String>) {
    if jwt.expiry_minutes <= 0 {
        errors.push(format!(
            "jwt.expiry_minutes must be positive, got {}",
            jwt.expiry_minutes
        ));
    } else if jwt.expiry_minutes > MAX_TOKEN_EXPIRY_MINUTES {
        errors.push(format!(
            "jwt.expiry_minutes must be at most {}, got {}",
            MAX_TOKEN_EXPIRY_MINUTES, jwt.expiry_minutes
        ));
    }
}

fn validate_google_books(books: &GoogleBooksConfig, errors: &mut Vec<String>) {
    if reqwest::Url::parse(&books.base_url).is_err() {
        errors.push(format!(
            "google_books.base_url '{}' is not a valid URL",
            books.base_url
        ));
    }
    if books.timeout_ms == 0 {
        errors.push("google_books.timeout_ms must be greater than 0".to_string());
    }
    if books.max_results == Some(0) {
        errors.push("google_books.max_results must be greater than 0".to_string());
    }
}

fn validate_cache(cache: &CacheConfig, errors: &mut Vec<String>) {
    if cache.ttl_seconds == 0 {
        errors.push("cache.ttl_seconds must be greater than 0".to_string());
    } else if cache.ttl_seconds > MAX_CACHE_TTL_SECS {
        errors.push(format!(
            "cache.ttl_seconds must be at most {}, got {}",
            MAX_CACHE_TTL_SECS, cache.ttl_seconds
        ));
    }
}
