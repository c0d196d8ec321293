//! Recommendation Metrics
//!
//! Prometheus collectors for the serving path and an actix handler for `/metrics`.

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge, Encoder, Histogram,
    IntCounterVec, IntGauge, TextEncoder,
};
use std::time::Duration;

static RECOMMEND_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "game_recommend_requests_total",
        "Total recommendation requests (success/error)",
        &["status"]
    )
    .expect("Failed to register recommend requests metric")
});

static RECOMMEND_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "game_recommend_duration_seconds",
        "Duration of recommendation requests",
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
    )
    .expect("Failed to register recommend duration metric")
});

static BUNDLE_RELOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "game_bundle_reloads_total",
        "Total artifact bundle reloads (success/error)",
        &["status"]
    )
    .expect("Failed to register bundle reloads metric")
});

static CATALOG_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "game_catalog_items",
        "Number of catalog items in the serving bundle"
    )
    .expect("Failed to register catalog items metric")
});

/// Record a recommendation request result (success/error) and its duration
pub fn record_request(status: &str, duration: Duration) {
    RECOMMEND_REQUESTS_TOTAL.with_label_values(&[status]).inc();
    RECOMMEND_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a bundle reload result (success/error)
pub fn record_reload(status: &str) {
    BUNDLE_RELOADS_TOTAL.with_label_values(&[status]).inc();
}

pub fn set_catalog_items(items: usize) {
    CATALOG_ITEMS.set(items as i64);
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
