//! # Storage and Persistence
//!
//! Database connectivity and persistence layer for account and token data.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use migrations::run_migrations;
pub use pool::{create_pool, DbPool};
pub use repositories::{
    AccountRepository, NewOutstandingToken, OutstandingToken, SqlxAccountRepository,
    SqlxTokenRepository, TokenRepository,
};

use crate::errors::{Error, Result};

/// Check database connectivity
pub async fn check_connection(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| Error::database(e, "Database connectivity check failed"))?;

    Ok(())
}
