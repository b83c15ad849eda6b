//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`],
//! and the HTTP rendering of [`AppError`] itself.

use super::app_error::AppError;

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() || err.is_data() {
            AppError::bad_request(format!("Malformed JSON body: {}", err)).with_source(err)
        } else {
            AppError::internal("Internal Server Error").with_source(err)
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::BytesRejection> for AppError {
    fn from(rejection: axum::extract::rejection::BytesRejection) -> Self {
        if rejection.status() == http::StatusCode::PAYLOAD_TOO_LARGE {
            AppError::payload_too_large("Request body is too large").with_source(rejection)
        } else {
            AppError::bad_request("Failed to read request body").with_source(rejection)
        }
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::FormRejection> for AppError {
    fn from(rejection: axum::extract::rejection::FormRejection) -> Self {
        use axum::extract::rejection::FormRejection;

        match rejection {
            FormRejection::BytesRejection(inner) => inner.into(),
            other => AppError::bad_request(format!("Malformed form body: {}", other.body_text()))
                .with_source(other),
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use http::StatusCode;

        use crate::response::error_response;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let report = self.is_server_error().then(|| self.report());
        let body = error_response(self.message().to_string(), self.details().cloned());

        let mut response = (status, Json(body)).into_response();
        if let Some(report) = report {
            response.extensions_mut().insert(report);
        }
        response
    }
}
