//! Security Error Types
//!
//! Login and token failures, mapped onto the unified
//! `kernel::error::AppError` response envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Message returned for unknown emails and wrong passwords alike
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

/// Security-specific result type alias
pub type SecurityResult<T> = Result<T, SecurityError>;

/// Security-specific error variants
#[derive(Debug, Error)]
pub enum SecurityError {
    /// Unknown email or wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Credential store reported a lockout
    #[error("Account is temporarily locked. Please try again later. Lockout until: {until}")]
    AccountLocked { until: String },

    /// Internal route called without a bearer token
    #[error("Unauthorized: No token provided")]
    MissingToken,

    /// Internal route called with a token that failed verification
    #[error("Unauthorized: Invalid token")]
    InvalidToken,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Token signing or decoding failed while issuing a login token
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SecurityError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SecurityError::InvalidCredentials
            | SecurityError::MissingToken
            | SecurityError::InvalidToken => StatusCode::UNAUTHORIZED,
            SecurityError::AccountLocked { .. } => StatusCode::FORBIDDEN,
            SecurityError::Database(_) | SecurityError::Token(_) | SecurityError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SecurityError::InvalidCredentials
            | SecurityError::MissingToken
            | SecurityError::InvalidToken => ErrorKind::Unauthorized,
            SecurityError::AccountLocked { .. } => ErrorKind::Forbidden,
            SecurityError::Database(_) | SecurityError::Token(_) | SecurityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Client errors carry their own message. Server errors are reduced to
    /// a generic message and keep the original error as the source.
    pub fn into_app_error(self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            return AppError::internal("Internal Server Error").with_source(self);
        }
        AppError::new(kind, self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SecurityError::Database(e) => {
                tracing::error!(error = %e, "Security database error");
            }
            SecurityError::Token(e) => {
                tracing::error!(error = %e, "Token issuance failed");
            }
            SecurityError::Internal(msg) => {
                tracing::error!(message = %msg, "Security internal error");
            }
            SecurityError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            SecurityError::AccountLocked { until } => {
                tracing::warn!(lockout_until = %until, "Login attempt on locked account");
            }
            SecurityError::MissingToken | SecurityError::InvalidToken => {
                tracing::debug!(error = %self, "Internal route access denied");
            }
        }
    }
}

impl From<SecurityError> for AppError {
    fn from(err: SecurityError) -> Self {
        err.into_app_error()
    }
}

impl IntoResponse for SecurityError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
