//! Auth API handlers: token obtain/refresh/verify and the logout pair.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::instrument;
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::auth::middleware::CurrentAccount;
use crate::auth::session::{
    AccessTokenResponse, LoginRequest, RefreshTokenRequest, TokenPairResponse, VerifyTokenRequest,
};

/// Obtain an access/refresh token pair for valid credentials.
#[utoipa::path(
    post,
    path = "/auth/token/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "No active account with the given credentials")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn obtain_token_pair_handler(
    State(state): State<ApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    payload.validate()?;

    let pair = state.sessions.obtain_token_pair(&payload).await?;
    Ok(Json(pair))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/auth/token/refresh/",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Refresh token invalid, expired, or blacklisted")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn refresh_token_handler(
    State(state): State<ApiState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let access = state.sessions.refresh_token(&payload.refresh).await?;
    Ok(Json(access))
}

/// Verify a token's signature, expiry, and blacklist state.
#[utoipa::path(
    post,
    path = "/auth/token/verify/",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Token invalid, expired, or blacklisted")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn verify_token_handler(
    State(state): State<ApiState>,
    payload: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    state.sessions.verify_token(&payload.token).await?;
    Ok(Json(json!({})))
}

/// Log out by blacklisting the presented refresh token.
#[utoipa::path(
    post,
    path = "/auth/logout/",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Refresh token blacklisted"),
        (status = 401, description = "Refresh token invalid or expired")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout_handler(
    State(state): State<ApiState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    state.sessions.logout(&payload.refresh).await?;
    Ok(Json(json!({})))
}

/// Log out everywhere: blacklist every outstanding refresh token the caller
/// owns.
#[utoipa::path(
    get,
    path = "/auth/logout_all/",
    responses(
        (status = 205, description = "All refresh tokens blacklisted"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
#[instrument(skip(state, current), fields(account_id = current.account.id))]
pub async fn logout_all_handler(
    State(state): State<ApiState>,
    Extension(current): Extension<CurrentAccount>,
) -> Result<StatusCode, ApiError> {
    state.sessions.logout_all(current.account.id).await?;
    Ok(StatusCode::RESET_CONTENT)
}
