use std::sync::Arc;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

/// The metrics if something already initialized them, for synchronous callers.
pub fn initialized_metrics() -> Option<&'static Arc<Metrics>> {
    METRICS_INSTANCE.get()
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Lookup metrics
    pub lookup_requests: IntCounterVec,
    pub cache_hits: IntCounterVec,
    pub cache_misses: IntCounterVec,

    // Upstream metrics
    pub upstream_requests: IntCounterVec,
    pub upstream_failures: IntCounterVec,
    pub upstream_duration: HistogramVec,

    // Token metrics
    pub tokens_issued: IntCounter,
    pub token_rejections: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("bookgateway".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Lookup
            lookup_requests: IntCounterVec::new(
                Opts::new("lookup_requests_total", "Book lookups by operation"),
                &["operation"],
            )
            .unwrap(),
            cache_hits: IntCounterVec::new(
                Opts::new("cache_hits_total", "Lookups served from cache"),
                &["operation"],
            )
            .unwrap(),
            cache_misses: IntCounterVec::new(
                Opts::new("cache_misses_total", "Lookups that went upstream"),
                &["operation"],
            )
            .unwrap(),

            // Upstream
            upstream_requests: IntCounterVec::new(
                Opts::new("upstream_requests_total", "Google Books requests by operation"),
                &["operation"],
            )
            .unwrap(),
            upstream_failures: IntCounterVec::new(
                Opts::new("upstream_failures_total", "Google Books failures by reason"),
                &["operation", "reason"],
            )
            .unwrap(),
            upstream_duration: HistogramVec::new(
                HistogramOpts::new("upstream_duration_seconds", "Google Books request duration seconds")
                    .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
                &["operation"],
            )
            .unwrap(),

            // Tokens
            tokens_issued: IntCounter::new("tokens_issued_total", "Bearer tokens issued").unwrap(),
            token_rejections: IntCounterVec::new(
                Opts::new("token_rejections_total", "Bearer tokens rejected by reason"),
                &["reason"],
            )
            .unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new(
                "config_validation_errors_total",
                "Validation errors during startup",
            )
            .unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.lookup_requests.clone())).unwrap();
        reg.register(Box::new(metrics.cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.cache_misses.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_requests.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_failures.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_duration.clone())).unwrap();
        reg.register(Box::new(metrics.tokens_issued.clone())).unwrap();
        reg.register(Box::new(metrics.token_rejections.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
