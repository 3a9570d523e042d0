//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use board::BoardError;
use board::rules::RuleError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Session token not in the store (stale or unknown)
    #[error("session token not in cache")]
    SessionNotCached,

    /// Session token has passed its expiry
    #[error("session token has expired")]
    SessionExpired,

    /// The random source returned fewer bytes than requested
    #[error("random source returned fewer bytes than required")]
    TokenEntropy,

    /// Wrong password
    #[error("incorrect password")]
    InvalidCredentials,

    /// User name already exists
    #[error("username is taken")]
    UserNameTaken,

    /// A form field failed validation
    #[error(transparent)]
    Validation(#[from] RuleError),

    /// Request requires a signed-in user
    #[error("not signed in")]
    Unauthenticated,

    /// Credential hashing failed
    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),

    /// Storage-layer error
    #[error(transparent)]
    Storage(#[from] BoardError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::SessionNotCached
            | AuthError::SessionExpired
            | AuthError::InvalidCredentials
            | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Storage(e) => e.kind(),
            AuthError::TokenEntropy | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::InvalidCredentials => {
                tracing::warn!("invalid login attempt");
            }
            AuthError::TokenEntropy => {
                tracing::error!("random source exhausted while minting a token");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "password hashing error");
            }
            AuthError::Storage(e) if e.kind().is_server_error() => {
                tracing::error!(error = %e, "storage error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "auth internal error");
            }
            _ => {
                tracing::debug!(error = %self, "auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
