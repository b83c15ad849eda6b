//! Response Envelope
//!
//! Every JSON response body produced by the API uses one of two shapes:
//!
//! ```json
//! { "success": true,  "data": { ... }, "timestamp": "2025-01-01T00:00:00.000Z" }
//! { "success": false, "error": { "message": "...", "details": [ ... ] }, "timestamp": "..." }
//! ```

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Current time as RFC 3339 UTC with millisecond precision (`...T12:00:00.000Z`)
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Successful response envelope
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse<T> {
    success: bool,
    pub data: T,
    pub timestamp: String,
}

/// Failed response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    success: bool,
    pub error: ErrorBody,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Wrap `data` in the success envelope
pub fn success_response<T: Serialize>(data: T) -> SuccessResponse<T> {
    SuccessResponse {
        success: true,
        data,
        timestamp: timestamp(),
    }
}

/// Build the error envelope
pub fn error_response(
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ErrorBody {
            message: message.into(),
            details,
        },
        timestamp: timestamp(),
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for SuccessResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (http::StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(success_response(json!({"token": "t"}))).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["token"], "t");
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_error_envelope_omits_missing_details() {
        let body = serde_json::to_value(error_response("Internal Server Error", None)).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["message"], "Internal Server Error");
        assert!(body["error"].get("details").is_none());
    }

    #[test]
    fn test_timestamp_is_utc_millis() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        // 2025-01-01T00:00:00.000Z
        assert_eq!(ts.len(), 24);
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
