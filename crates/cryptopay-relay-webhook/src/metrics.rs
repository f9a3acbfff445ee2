use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::LazyLock;

pub static WEBHOOK_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "cryptopay_webhook_requests_total",
        "Total webhook invocations by outcome",
        &["outcome"]
    )
    .unwrap()
});

pub static WEBHOOK_LATENCY: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "cryptopay_webhook_duration_seconds",
        "Webhook processing latency in seconds",
        &["outcome"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap()
});

pub static SIGNATURE_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "cryptopay_webhook_signature_failures_total",
        "Webhook signature verification failures",
        &["reason"]
    )
    .unwrap()
});

pub static FORWARDS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "cryptopay_webhook_forward_total",
        "Backend forward attempts by result",
        &["result"]
    )
    .unwrap()
});

pub static NOTIFICATIONS: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!(
        "cryptopay_webhook_notifications_total",
        "Admin notifications delivered"
    )
    .unwrap()
});

/// Force registration so every series shows up on the first scrape.
pub fn register_metrics() {
    LazyLock::force(&WEBHOOK_REQUESTS);
    LazyLock::force(&WEBHOOK_LATENCY);
    LazyLock::force(&SIGNATURE_FAILURES);
    LazyLock::force(&FORWARDS);
    LazyLock::force(&NOTIFICATIONS);
}

pub fn metrics_output() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
