//! # Error Handling
//!
//! Crate-wide error types for the Keygate account backend using `thiserror`.
//! The HTTP layer maps these onto response bodies in `api::error`.

use std::fmt;

/// Custom result type for Keygate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Keygate backend
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Password strength validation failures
    #[error("Password validation failed: {0}")]
    InvalidPassword(String),

    /// Resource conflict errors (duplicate username)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found errors
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },

    /// Authentication and authorization errors
    #[error("Authentication error: {message}")]
    Auth { message: String, kind: AuthErrorKind },

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Authentication error subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// No usable credentials were presented
    NotAuthenticated,
    /// Authenticated, but the caller's role does not permit the operation
    PermissionDenied,
    /// Token is malformed, expired, or blacklisted
    InvalidToken,
    /// Login credentials did not match an active account
    InvalidCredentials,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthErrorKind::NotAuthenticated => write!(f, "not_authenticated"),
            AuthErrorKind::PermissionDenied => write!(f, "permission_denied"),
            AuthErrorKind::InvalidToken => write!(f, "token_not_valid"),
            AuthErrorKind::InvalidCredentials => write!(f, "no_active_account"),
        }
    }
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a database error with context
    pub fn database<S: Into<String>>(source: sqlx::Error, context: S) -> Self {
        Self::Database { source, context: context.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a conflict error
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: ToString>(resource: R, id: I) -> Self {
        Self::NotFound { resource: resource.into(), id: id.to_string() }
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(message: S, kind: AuthErrorKind) -> Self {
        Self::Auth { message: message.into(), kind }
    }

    /// Create an internal server error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let codes: Vec<String> = field_errors.iter().map(|e| e.code.to_string()).collect();
                format!("{}: {}", field, codes.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let error = Error::validation("username may not be blank");
        assert_eq!(error.to_string(), "Validation error: username may not be blank");

        let error = Error::not_found("Account", 7);
        assert_eq!(error.to_string(), "Account with id '7' not found");
    }

    #[test]
    fn auth_error_kind_codes_are_stable() {
        assert_eq!(AuthErrorKind::NotAuthenticated.to_string(), "not_authenticated");
        assert_eq!(AuthErrorKind::PermissionDenied.to_string(), "permission_denied");
        assert_eq!(AuthErrorKind::InvalidToken.to_string(), "token_not_valid");
        assert_eq!(AuthErrorKind::InvalidCredentials.to_string(), "no_active_account");
    }

    #[test]
    fn validation_errors_collapse_into_message() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("email", validator::ValidationError::new("invalid_email"));
        let error: Error = errors.into();
        assert!(matches!(error, Error::Validation { .. }));
        assert!(error.to_string().contains("email"));
    }
}
