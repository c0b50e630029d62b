//! Metrics collection and exposition.
//!
//! # Metrics
//! - `watchtower_probes_total` (counter): probe verdicts by target, outcome
//! - `watchtower_target_up` (gauge): 1=alive, 0=dead
//! - `watchtower_notifications_total` (counter): deliveries by status
//! - `watchtower_ticks_total` (counter): tick rounds, gated or sent

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the Prometheus recorder once and return its render handle.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        })
        .clone()
}

pub fn record_probe(target: &str, healthy: bool) {
    let outcome = if healthy { "healthy" } else { "unhealthy" };
    metrics::counter!(
        "watchtower_probes_total",
        "target" => target.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_target_up(target: &str, up: bool) {
    metrics::gauge!("watchtower_target_up", "target" => target.to_string())
        .set(if up { 1.0 } else { 0.0 });
}

pub fn record_notification(delivered: bool) {
    let status = if delivered { "delivered" } else { "failed" };
    metrics::counter!("watchtower_notifications_total", "status" => status).increment(1);
}

pub fn record_tick(gated: bool) {
    let gated = if gated { "true" } else { "false" };
    metrics::counter!("watchtower_ticks_total", "gated" => gated).increment(1);
}
