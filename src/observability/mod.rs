//! # Observability Infrastructure
//!
//! Structured logging via the tracing ecosystem plus optional Prometheus
//! metrics. Initialised once at startup from [`ObservabilityConfig`].

pub mod metrics;

pub use metrics::init_metrics;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::errors::Result;

/// Initialize logging and, when enabled, the metrics exporter.
pub fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    init_tracing(config);

    if config.enable_metrics {
        init_metrics(config)?;
    }

    info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        metrics_enabled = %config.enable_metrics,
        "Observability initialized"
    );

    Ok(())
}

/// Install the global tracing subscriber. Safe to call more than once;
/// subsequent calls are ignored (tests initialise their own subscribers).
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    if config.json_logs {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        let config = ObservabilityConfig::default();
        init_tracing(&config);
        init_tracing(&config);
    }
}
