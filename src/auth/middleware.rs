//! Axum middleware for bearer-token authentication.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use tracing::{field, info_span, warn};

use crate::account::model::Account;
use crate::api::error::ApiError;
use crate::auth::jwt::{JwtCodec, TokenType};
use crate::auth::policy::Role;
use crate::errors::Error;
use crate::observability::metrics;
use crate::storage::repositories::account::AccountRepository;

/// Request-scoped identity derived from a valid access token.
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub account: Account,
}

impl CurrentAccount {
    pub fn role(&self) -> Role {
        Role::for_account(&self.account)
    }
}

/// Errors returned by the authentication middleware.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingBearer,
    #[error("Authorization header must contain a Bearer token")]
    MalformedBearer,
    #[error("Given token not valid for any token type")]
    InvalidToken,
    #[error("User not found")]
    UnknownAccount,
    #[error("User is inactive")]
    InactiveAccount,
    #[error(transparent)]
    Persistence(#[from] Error),
}

/// Validates bearer tokens and resolves the owning account.
pub struct Authenticator {
    account_repository: Arc<dyn AccountRepository>,
    codec: Arc<JwtCodec>,
}

impl Authenticator {
    pub fn new(account_repository: Arc<dyn AccountRepository>, codec: Arc<JwtCodec>) -> Self {
        Self { account_repository, codec }
    }

    /// Authenticate an `Authorization` header value.
    pub async fn authenticate(&self, header: &str) -> Result<CurrentAccount, AuthError> {
        let header = header.trim();
        if header.is_empty() {
            metrics::record_authentication("missing_bearer");
            return Err(AuthError::MissingBearer);
        }

        let Some(token) = header.strip_prefix("Bearer ") else {
            metrics::record_authentication("malformed");
            return Err(AuthError::MalformedBearer);
        };

        let claims = self
            .codec
            .decode_typed(token.trim(), TokenType::Access)
            .map_err(|_| {
                metrics::record_authentication("invalid_token");
                AuthError::InvalidToken
            })?;
        let account_id = claims.account_id().map_err(|_| AuthError::InvalidToken)?;

        let account = match self.account_repository.get(account_id).await? {
            Some(account) => account,
            None => {
                metrics::record_authentication("unknown_account");
                return Err(AuthError::UnknownAccount);
            }
        };

        if !account.is_active {
            metrics::record_authentication("inactive_account");
            return Err(AuthError::InactiveAccount);
        }

        metrics::record_authentication("bearer_success");
        Ok(CurrentAccount { account })
    }
}

/// Middleware entry point that authenticates requests using the configured
/// [`Authenticator`] and stores the caller identity as a request extension.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!(
        "auth_middleware.authenticate",
        http.method = %method,
        http.path = %path,
        account_id = field::Empty
    );
    let _guard = span.enter();

    let header =
        request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok()).unwrap_or("");

    match authenticator.authenticate(header).await {
        Ok(current) => {
            tracing::Span::current().record("account_id", current.account.id);
            request.extensions_mut().insert(current);
            Ok(next.run(request).await)
        }
        Err(err) => {
            warn!(error = %err, "authentication failed");
            Err(ApiError::from(err))
        }
    }
}
