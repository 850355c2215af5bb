//! HTTP server startup.

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::{Error, Result};
use crate::storage::DbPool;

use super::routes::build_router;

/// Bind and serve the API until interrupted.
pub async fn start_api_server(config: &AppConfig, pool: DbPool) -> Result<()> {
    let mut router = build_router(pool, &config.auth);

    if config.server.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind API server on {}: {}", addr, e)))?;

    info!(address = %addr, "Starting HTTP API server");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "API server shutdown listener failed");
            }
        })
        .await
        .map_err(|e| Error::internal(format!("API server error: {}", e)))?;

    info!("API server shutdown completed");
    Ok(())
}
