//! API Server
//!
//! Configuration, router assembly and server plumbing. The binary in
//! `main.rs` wires these together; tests drive [`app::build_app`] directly.

pub mod app;
pub mod config;
pub mod database;
pub mod telemetry;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
