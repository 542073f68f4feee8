//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sns_confirmations_total` (counter): confirmation outcomes by `outcome`
//! - `sns_content_type_overrides_total` (counter): requests relabelled as JSON
//! - `sns_messages_total` (counter): deliveries reaching the endpoint, by `type`

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter and its HTTP listener.
///
/// Must be called from within the tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count a confirmation outcome (`subscribed` or a `ConfirmError::kind`).
pub fn record_confirmation(outcome: &'static str) {
    ::metrics::counter!("sns_confirmations_total", "outcome" => outcome).increment(1);
}

pub fn record_content_type_override() {
    ::metrics::counter!("sns_content_type_overrides_total").increment(1);
}

/// Count a delivery handled by the endpoint. Labels come from `SnsMessageType::metric_label`.
pub fn record_message(message_type: &'static str) {
    ::metrics::counter!("sns_messages_total", "type" => message_type).increment(1);
}
