//! # Metrics Collection
//!
//! Prometheus counters for authentication and token lifecycle events.

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Install the Prometheus exporter and register metric descriptions.
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", config.metrics_port)
        .parse()
        .map_err(|e| Error::config(format!("Invalid metrics address: {}", e)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| Error::internal(format!("Failed to install metrics exporter: {}", e)))?;

    describe_counter!("auth_attempts_total", "Authentication attempts by outcome");
    describe_counter!("tokens_issued_total", "Refresh token pairs issued");
    describe_counter!("tokens_blacklisted_total", "Refresh tokens added to the blacklist");

    info!(port = config.metrics_port, "Prometheus metrics exporter installed");
    Ok(())
}

/// Record an authentication attempt outcome (login or bearer validation).
pub fn record_authentication(result: &str) {
    let labels = [("result", result.to_string())];
    counter!("auth_attempts_total", &labels).increment(1);
}

/// Record an issued token pair.
pub fn record_token_issued() {
    counter!("tokens_issued_total").increment(1);
}

/// Record refresh tokens entering the blacklist.
pub fn record_token_blacklisted(count: u64) {
    counter!("tokens_blacklisted_total").increment(count);
}
