//! Prometheus metrics for the tagrank server.
//!
//! Covers tag refreshes (outcome, error kind, duration), the size of the
//! stored batch and the number of ranked reads served.
//!
//! The `/metrics` endpoint is unauthenticated; restrict it at the network
//! level when the server is reachable from untrusted clients.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    self, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Refresh metrics
pub static REFRESHES_SUCCEEDED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "tagrank_refreshes_succeeded_total",
        "Total number of tag refreshes that replaced the stored batch",
    )
    .expect("metric creation failed")
});

pub static REFRESHES_FAILED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "tagrank_refreshes_failed_total",
            "Total number of failed tag refreshes by error type",
        ),
        &["error_type"],
    )
    .expect("metric creation failed")
});

pub static REFRESH_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "tagrank_refresh_duration_seconds",
            "Time taken to fetch and store one tag batch",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .expect("metric creation failed")
});

// Store state
pub static TAGS_STORED: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "tagrank_tags_stored",
        "Number of tags in the most recently stored batch",
    )
    .expect("metric creation failed")
});

// Read metrics
pub static QUERIES_SERVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "tagrank_queries_served_total",
        "Total number of ranked tag pages served",
    )
    .expect("metric creation failed")
});

/// Guard to ensure metrics are only registered once.
static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Idempotent, so tests and embedded routers may call it repeatedly.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(REFRESHES_SUCCEEDED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(REFRESHES_FAILED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(REFRESH_DURATION.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(TAGS_STORED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(QUERIES_SERVED.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Helper to record a failed refresh by error type.
pub fn record_refresh_failure(error_type: &str) {
    REFRESHES_FAILED.with_label_values(&[error_type]).inc();
}
