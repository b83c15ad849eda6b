//! Request Validation Issues
//!
//! Validators report every problem they find, each tagged with the dotted
//! path of the offending field (`body.email`). A non-empty issue list becomes
//! a 400 response with the issues under `error.details`.

use serde::Serialize;

use crate::error::app_error::AppError;

/// A single validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

/// Accumulates issues while a payload is checked
#[derive(Debug, Default)]
pub struct ValidationIssues {
    issues: Vec<ValidationIssue>,
}

impl ValidationIssues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// The 400 error carrying every collected issue under `details`
    pub fn into_error(self) -> AppError {
        let details = serde_json::to_value(&self.issues).unwrap_or_default();
        AppError::bad_request("Validation failed").with_details(details)
    }
}

/// Human name of a JSON value's type, used in "Expected X, received Y" messages
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
