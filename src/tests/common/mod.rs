// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::books::lookup::{BookLookupService, LookupSettings};
use crate::books::transport::ReqwestTransport;
use crate::books::GoogleBooksLookup;
use crate::cache::book_cache::MemoryBookCache;
use crate::config::types::JwtConfig;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        key: Some("integration-secret-with-enough-bytes".to_owned()),
        issuer: Some("shelf-api".to_owned()),
        audience: Some("shelf-web".to_owned()),
        expiry_minutes: 90,
    }
}

pub fn test_settings() -> LookupSettings {
    LookupSettings {
        timeout: Duration::from_secs(5),
        cache_ttl: Duration::from_secs(300),
        ..LookupSettings::default()
    }
}

/// Lookup service talking to `base_url` (an httpmock server) with a fresh cache.
pub fn lookup_against(base_url: &str, settings: LookupSettings) -> (GoogleBooksLookup, MemoryBookCache) {
    let cache = MemoryBookCache::new();
    let transport = ReqwestTransport::new(build_reqwest_client(), base_url);
    (BookLookupService::new(transport, cache.clone(), settings), cache)
}

/// A `/volumes` item as Google Books returns it.
pub fn volume(id: &str, title: &str, authors: &[&str], isbn13: Option<&str>) -> Value {
    let mut info = json!({ "title": title, "authors": authors });
    if let Some(isbn) = isbn13 {
        info["industryIdentifiers"] = json!([{ "type": "ISBN_13", "identifier": isbn }]);
    }
    json!({ "kind": "books#volume", "id": id, "volumeInfo": info })
}

pub fn volumes_body(items: Vec<Value>) -> Value {
    json!({ "kind": "books#volumes", "totalItems": items.len(), "items": items })
}
