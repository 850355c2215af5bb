//! Account API handlers: the self view plus the admin management surface.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;
use validator::Validate;

use crate::account::model::{
    AccountPreviewResponse, CreateAccountRequest, PersonalAccountResponse, UpdateAccountRequest,
};
use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::auth::middleware::CurrentAccount;
use crate::auth::policy::{authorize, AccountOperation};

/// Show account details of the logged in caller.
#[utoipa::path(
    get,
    path = "/account/",
    responses(
        (status = 200, description = "Personal account view", body = PersonalAccountResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
#[instrument(skip(state, current), fields(account_id = current.account.id))]
pub async fn personal_account_handler(
    State(state): State<ApiState>,
    Extension(current): Extension<CurrentAccount>,
) -> Result<Json<PersonalAccountResponse>, ApiError> {
    authorize(current.role(), AccountOperation::ViewOwn)?;

    let account = state
        .accounts
        .get_account(current.account.id)
        .await?
        .ok_or_else(ApiError::account_not_found)?;

    Ok(Json(account.into()))
}

/// List all user accounts (admin tier).
#[utoipa::path(
    get,
    path = "/account/management/",
    responses(
        (status = 200, description = "All accounts", body = [AccountPreviewResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin tier required")
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
#[instrument(skip(state, current), fields(account_id = current.account.id))]
pub async fn list_accounts_handler(
    State(state): State<ApiState>,
    Extension(current): Extension<CurrentAccount>,
) -> Result<Json<Vec<AccountPreviewResponse>>, ApiError> {
    authorize(current.role(), AccountOperation::List)?;

    let accounts = state.accounts.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Retrieve a user account by id (admin tier).
#[utoipa::path(
    get,
    path = "/account/management/{id}/",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account found", body = AccountPreviewResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin tier required"),
        (status = 404, description = "No such account")
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
#[instrument(skip(state, current), fields(account_id = current.account.id, target_id = id))]
pub async fn retrieve_account_handler(
    State(state): State<ApiState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i64>,
) -> Result<Json<AccountPreviewResponse>, ApiError> {
    // Authorization precedes the lookup so existence never leaks.
    authorize(current.role(), AccountOperation::Retrieve)?;

    let account = state
        .accounts
        .get_account(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;

    Ok(Json(account.into()))
}

/// Create a user account (superuser only).
#[utoipa::path(
    post,
    path = "/account/management/create/",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountPreviewResponse),
        (status = 400, description = "Validation failure or weak password"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Superuser required")
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
#[instrument(skip(state, current, payload), fields(account_id = current.account.id))]
pub async fn create_account_handler(
    State(state): State<ApiState>,
    Extension(current): Extension<CurrentAccount>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountPreviewResponse>), ApiError> {
    // The authorization gate runs before the body is even deserialized.
    authorize(current.role(), AccountOperation::Create)?;

    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    payload.validate()?;

    let account = state.accounts.create_account(payload).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Update a user account, full or partial payload (superuser only).
#[utoipa::path(
    patch,
    path = "/account/management/{id}/update/",
    params(("id" = i64, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountPreviewResponse),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Superuser required"),
        (status = 404, description = "No such account")
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
#[instrument(skip(state, current, payload), fields(account_id = current.account.id, target_id = id))]
pub async fn update_account_handler(
    State(state): State<ApiState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<Json<AccountPreviewResponse>, ApiError> {
    authorize(current.role(), AccountOperation::Update)?;

    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    payload.validate()?;

    let account = state.accounts.update_account(id, payload).await?;
    Ok(Json(account.into()))
}

/// Delete a user account by id (superuser only).
#[utoipa::path(
    delete,
    path = "/account/management/{id}/delete/",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Superuser required"),
        (status = 404, description = "No such account")
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
#[instrument(skip(state, current), fields(account_id = current.account.id, target_id = id))]
pub async fn delete_account_handler(
    State(state): State<ApiState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    authorize(current.role(), AccountOperation::Delete)?;

    state.accounts.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
