//! Error Report - server-side description of a 5xx failure
//!
//! Attached to outgoing responses as an extension so an outer middleware,
//! which knows the request path and method, can log it.

use std::fmt;

/// Message and cause chain of a server error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    message: String,
    causes: Vec<String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>, causes: Vec<String>) -> Self {
        Self {
            message: message.into(),
            causes,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying errors, outermost first
    pub fn causes(&self) -> &[String] {
        &self.causes
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for cause in &self.causes {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}
