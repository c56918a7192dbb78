use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::auth::token_service::TokenService;
use crate::books::lookup::{BookLookupService, LookupSettings};
use crate::books::transport::ReqwestTransport;
use crate::books::GoogleBooksLookup;
use crate::cache::book_cache::MemoryBookCache;
use crate::config::settings::SettingsConfig;
use crate::config::types::ServiceConfig;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::server::routes::{books_router, health_router};

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub books: Arc<GoogleBooksLookup>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wire the production collaborators from config. The cache lives as long as the state.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let metrics = get_metrics().await;
        let transport = ReqwestTransport::from_config(&service_config.google_books)
            .context("building Google Books client")?;
        let settings = LookupSettings::from_config(&service_config.google_books, &service_config.cache);
        let books = BookLookupService::new(transport, MemoryBookCache::new(), settings);

        Ok(Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            books: Arc::new(books),
            tokens: Arc::new(TokenService::new(service_config.jwt.clone())),
        })
    }
}

pub fn build_router(state: AppState, settings_config: &SettingsConfig) -> Router {
    Router::new()
        .merge(state.metrics_state.router(&settings_config.metrics))
        .merge(health_router())
        .merge(books_router())
        .with_state(state)
}

/// Start the HTTP server and serve until shutdown.
pub async fn start(service_config: &ServiceConfig) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::from_config(service_config).await?;
    let settings_config = &service_config.settings;
    let app = build_router(state, settings_config);

    let bind_addr = format!("{}:{}", settings_config.server.host, settings_config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!("listening on {}", bind_addr);
    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    metrics.up.set(0);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
