//! Security (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, store traits
//! - `application/` - Login use case, token signing, configuration
//! - `infra/` - PostgreSQL store (plus an in-memory store for tests)
//! - `presentation/` - HTTP handlers, request validation, routers
//!
//! ## Features
//! - Email + password login returning an HS256 JWT
//! - "Remember me" extends the token lifetime
//! - Lockout and failure counting delegated to the credential store
//! - Optional bearer-token gate for internal routes
//!
//! ## Security Model
//! - Passwords verified against bcrypt or Argon2id hashes off the async runtime
//! - Unknown email and wrong password produce the same response
//! - Every password check is reported to the store, successful or not

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SecurityConfig;
pub use application::token::{JwtPayload, TokenSigner};
pub use error::{SecurityError, SecurityResult};
pub use infra::postgres::PgSecurityStore;
pub use presentation::middleware::{AuthenticatedUser, InternalAccess};
pub use presentation::router::{internal_router, security_router, security_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}
