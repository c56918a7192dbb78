use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

pub fn get_instant() -> Instant {
    Instant::now()
}

/// Instant at which a value stored now stops being served, `None` if `ttl`
/// runs past what the clock can represent.
pub fn expires_at(ttl: Duration) -> Option<Instant> {
    get_instant().checked_add(ttl)
}
