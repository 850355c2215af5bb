//! HTTP error mapping.
//!
//! Every error body is `{"detail": {"code", "message"}}`; consumers branch
//! on the stable `code`, never on message text.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::auth::middleware::AuthError;
use crate::errors::{AuthErrorKind, Error};

#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: &'static str, message: String },
    Unauthorized { code: &'static str, message: String },
    Forbidden(String),
    NotFound { code: &'static str, message: String },
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        ApiError::BadRequest { code: "invalid", message: message.into() }
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        ApiError::Unauthorized { code: "not_authenticated", message: message.into() }
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        ApiError::NotFound { code: "not_found", message: message.into() }
    }

    /// 404 variant for the self-view, matching its historical code.
    pub fn account_not_found() -> Self {
        ApiError::NotFound { code: "account_not_found", message: "Account not found.".to_string() }
    }
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let (code, message) = match self {
            ApiError::BadRequest { code, message } => (code, message),
            ApiError::Unauthorized { code, message } => (code, message),
            ApiError::Forbidden(message) => ("permission_denied", message),
            ApiError::NotFound { code, message } => (code, message),
            ApiError::Internal(message) => ("internal_error", message),
        };

        (status, Json(ErrorBody { detail: ErrorDetail { code, message } })).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation { message, .. } => ApiError::bad_request(message),
            Error::InvalidPassword(message) => {
                ApiError::BadRequest { code: "invalid_password", message }
            }
            Error::Conflict(message) => ApiError::BadRequest { code: "username_taken", message },
            Error::NotFound { .. } => ApiError::not_found("Not found."),
            Error::Auth { message, kind } => match kind {
                AuthErrorKind::NotAuthenticated => ApiError::unauthorized(message),
                AuthErrorKind::PermissionDenied => ApiError::forbidden(message),
                AuthErrorKind::InvalidToken => {
                    ApiError::Unauthorized { code: "token_not_valid", message }
                }
                AuthErrorKind::InvalidCredentials => {
                    ApiError::Unauthorized { code: "no_active_account", message }
                }
            },
            Error::Database { context, .. } => ApiError::Internal(context),
            Error::Config(message) | Error::Internal(message) => ApiError::Internal(message),
            Error::Io(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingBearer | AuthError::MalformedBearer => {
                ApiError::unauthorized(err.to_string())
            }
            AuthError::InvalidToken => {
                ApiError::Unauthorized { code: "token_not_valid", message: err.to_string() }
            }
            AuthError::UnknownAccount | AuthError::InactiveAccount => {
                ApiError::unauthorized(err.to_string())
            }
            AuthError::Persistence(inner) => {
                ApiError::Internal(format!("Authentication error: {}", inner))
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::from(Error::from(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn error_bodies_carry_stable_codes() {
        let (status, body) = body_json(ApiError::unauthorized("no credentials")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"]["code"], "not_authenticated");

        let (status, body) = body_json(ApiError::forbidden("nope")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"]["code"], "permission_denied");

        let (status, body) = body_json(ApiError::account_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"]["code"], "account_not_found");
    }

    #[tokio::test]
    async fn domain_errors_map_to_expected_codes() {
        let (status, body) =
            body_json(Error::InvalidPassword("This password is too common.".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"]["code"], "invalid_password");

        let (status, body) = body_json(Error::conflict("username taken").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"]["code"], "username_taken");

        let (status, body) = body_json(Error::not_found("Account", 7).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"]["code"], "not_found");

        let (status, body) = body_json(
            Error::auth("Token is blacklisted", AuthErrorKind::InvalidToken).into(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"]["code"], "token_not_valid");
    }
}
