//! Session service: token issuance, verification, refresh, and revocation.
//!
//! Refresh tokens move through `issued -> active -> blacklisted | expired`.
//! Both terminal states are absorbing: the blacklist is append-only and
//! expiry is enforced by signature validation, so neither transition can be
//! undone.

use std::sync::{Arc, LazyLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::hashing;
use crate::auth::jwt::{JwtCodec, TokenType};
use crate::errors::{AuthErrorKind, Error, Result};
use crate::observability::metrics;
use crate::storage::repositories::account::AccountRepository;
use crate::storage::repositories::token::{NewOutstandingToken, TokenRepository};

/// Pre-computed dummy hash for timing-safe user enumeration prevention.
/// When a non-existent username is used, we still run Argon2 verification
/// against this hash so the response time matches real verification.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hashing::hash_password("dummy_startup_value")
        .unwrap_or_else(|_| "$argon2id$v=19$m=768,t=1,p=1$dW5rbm93bg$dW5rbm93bg".to_string())
});

/// User authentication credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login: both token classes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub refresh: String,
    pub access: String,
}

/// Request carrying a refresh token (refresh and logout endpoints).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

/// Response for a successful refresh: a new access token only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// Request carrying a token of either class for verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Service for the refresh-token lifecycle.
#[derive(Clone)]
pub struct SessionService {
    account_repository: Arc<dyn AccountRepository>,
    token_repository: Arc<dyn TokenRepository>,
    codec: Arc<JwtCodec>,
}

impl SessionService {
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        token_repository: Arc<dyn TokenRepository>,
        codec: Arc<JwtCodec>,
    ) -> Self {
        Self { account_repository, token_repository, codec }
    }

    /// Authenticate credentials and issue an access/refresh token pair.
    ///
    /// The failure message is uniform across unknown username, wrong
    /// password, and inactive account, so callers cannot enumerate accounts.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn obtain_token_pair(&self, request: &LoginRequest) -> Result<TokenPairResponse> {
        let (account, password_hash) =
            match self.account_repository.get_with_password(&request.username).await? {
                Some(found) => found,
                None => {
                    // Burn the same hashing cost as a real verification.
                    if let Err(e) = hashing::verify_password(&request.password, &DUMMY_HASH) {
                        warn!(error = %e, "dummy hash verification failed unexpectedly");
                    }
                    metrics::record_authentication("invalid_credentials");
                    return Err(invalid_credentials());
                }
            };

        if !hashing::verify_password(&request.password, &password_hash)? {
            warn!(account_id = account.id, "login attempt with incorrect password");
            metrics::record_authentication("invalid_credentials");
            return Err(invalid_credentials());
        }

        if !account.is_active {
            warn!(account_id = account.id, "login attempt for inactive account");
            metrics::record_authentication("account_inactive");
            return Err(invalid_credentials());
        }

        let access = self.codec.issue(account.id, TokenType::Access)?;
        let refresh = self.codec.issue(account.id, TokenType::Refresh)?;

        self.token_repository
            .record_outstanding(NewOutstandingToken {
                jti: refresh.claims.jti.clone(),
                account_id: account.id,
                token: refresh.token.clone(),
                created_at: Utc::now(),
                expires_at: refresh.claims.expires_at(),
            })
            .await?;

        self.account_repository.set_last_login(account.id, Utc::now()).await?;

        metrics::record_authentication("success");
        metrics::record_token_issued();
        info!(account_id = account.id, "token pair issued");

        Ok(TokenPairResponse { refresh: refresh.token, access: access.token })
    }

    /// Exchange a valid, non-blacklisted refresh token for a new access token.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AccessTokenResponse> {
        let claims = self.codec.decode_typed(refresh_token, TokenType::Refresh)?;

        if self.token_repository.is_blacklisted(&claims.jti).await? {
            metrics::record_authentication("blacklisted");
            return Err(blacklisted());
        }

        let account_id = claims.account_id()?;
        let access = self.codec.issue(account_id, TokenType::Access)?;

        Ok(AccessTokenResponse { access: access.token })
    }

    /// Pure validation: signature, expiry, and blacklist membership.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, token: &str) -> Result<()> {
        let claims = self.codec.decode(token)?;

        if self.token_repository.is_blacklisted(&claims.jti).await? {
            return Err(blacklisted());
        }

        Ok(())
    }

    /// Blacklist a single refresh token. Idempotent: re-blacklisting an
    /// already-revoked token is a no-op success.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        let claims = self.codec.decode_typed(refresh_token, TokenType::Refresh)?;
        let account_id = claims.account_id()?;

        // A refresh token that predates its outstanding record (or whose
        // record was lost) is still revocable: restore the ledger row first.
        self.token_repository
            .record_outstanding(NewOutstandingToken {
                jti: claims.jti.clone(),
                account_id,
                token: refresh_token.to_string(),
                created_at: Utc::now(),
                expires_at: claims.expires_at(),
            })
            .await?;

        self.token_repository.blacklist(&claims.jti).await?;

        metrics::record_token_blacklisted(1);
        info!(account_id, "refresh token blacklisted");
        Ok(())
    }

    /// Blacklist every outstanding refresh token owned by an account.
    /// Commutes with concurrent logouts; already-blacklisted tokens are
    /// skipped.
    #[instrument(skip(self))]
    pub async fn logout_all(&self, account_id: i64) -> Result<()> {
        let revoked = self.token_repository.blacklist_all_for_account(account_id).await?;

        metrics::record_token_blacklisted(revoked);
        info!(account_id, revoked, "all refresh tokens blacklisted");
        Ok(())
    }
}

fn invalid_credentials() -> Error {
    Error::auth(
        "No active account found with the given credentials",
        AuthErrorKind::InvalidCredentials,
    )
}

fn blacklisted() -> Error {
    Error::auth("Token is blacklisted", AuthErrorKind::InvalidToken)
}
