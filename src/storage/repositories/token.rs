//! Refresh-token ledger: outstanding records and the append-only blacklist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

use crate::errors::{Error, Result};
use crate::storage::DbPool;

/// Stored representation of an issued refresh token.
#[derive(Debug, Clone, FromRow)]
pub struct OutstandingToken {
    pub jti: String,
    pub account_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// New outstanding-token payload, recorded at issuance.
#[derive(Debug, Clone)]
pub struct NewOutstandingToken {
    pub jti: String,
    pub account_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Record an issued refresh token. Idempotent on jti.
    async fn record_outstanding(&self, token: NewOutstandingToken) -> Result<()>;

    /// List outstanding tokens for an account
    async fn list_outstanding_for_account(&self, account_id: i64)
        -> Result<Vec<OutstandingToken>>;

    /// Check blacklist membership
    async fn is_blacklisted(&self, jti: &str) -> Result<bool>;

    /// Add one jti to the blacklist. Idempotent.
    async fn blacklist(&self, jti: &str) -> Result<()>;

    /// Blacklist every outstanding jti owned by an account. Returns the
    /// number of tokens newly added to the blacklist.
    async fn blacklist_all_for_account(&self, account_id: i64) -> Result<u64>;
}

#[derive(Debug, Clone)]
pub struct SqlxTokenRepository {
    pool: DbPool,
}

impl SqlxTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for SqlxTokenRepository {
    #[instrument(skip(self, token), fields(account_id = token.account_id), name = "db_record_outstanding")]
    async fn record_outstanding(&self, token: NewOutstandingToken) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO outstanding_tokens (jti, account_id, token, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&token.jti)
        .bind(token.account_id)
        .bind(&token.token)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to record outstanding token"))?;

        Ok(())
    }

    #[instrument(skip(self), fields(account_id = account_id), name = "db_list_outstanding")]
    async fn list_outstanding_for_account(
        &self,
        account_id: i64,
    ) -> Result<Vec<OutstandingToken>> {
        let rows = sqlx::query_as::<_, OutstandingToken>(
            "SELECT jti, account_id, token, created_at, expires_at \
             FROM outstanding_tokens WHERE account_id = $1 ORDER BY created_at",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to list outstanding tokens"))?;

        Ok(rows)
    }

    #[instrument(skip(self), name = "db_is_blacklisted")]
    async fn is_blacklisted(&self, jti: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM blacklisted_tokens WHERE jti = $1",
        )
        .bind(jti)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to check blacklist"))?;

        Ok(count > 0)
    }

    #[instrument(skip(self), name = "db_blacklist_token")]
    async fn blacklist(&self, jti: &str) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO blacklisted_tokens (jti, blacklisted_at) VALUES ($1, $2)",
        )
        .bind(jti)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to blacklist token"))?;

        Ok(())
    }

    #[instrument(skip(self), fields(account_id = account_id), name = "db_blacklist_all")]
    async fn blacklist_all_for_account(&self, account_id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO blacklisted_tokens (jti, blacklisted_at)
            SELECT jti, $1 FROM outstanding_tokens WHERE account_id = $2
            "#,
        )
        .bind(Utc::now())
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to blacklist account tokens"))?;

        Ok(result.rows_affected())
    }
}
