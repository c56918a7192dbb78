//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
pub const DEFAULT_TOKEN_EXPIRY_MINUTES: i64 = 60;

// Upper bounds accepted from config, one year each
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;
pub const MAX_TOKEN_EXPIRY_MINUTES: i64 = 365 * 24 * 60;

pub const DEFAULT_GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1";
/// Upper bound Google Books accepts for `maxResults`
pub const GOOGLE_BOOKS_MAX_RESULTS: u32 = 40;

/// Display name used when a user has none
pub const DEFAULT_DISPLAY_NAME: &str = "Reader";

// Upstream identifier types
pub const ISBN_13: &str = "ISBN_13";

// Cache key prefixes
pub const ISBN_KEY_PREFIX: &str = "isbn:";
