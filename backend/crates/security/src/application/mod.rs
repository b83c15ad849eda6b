//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod login;
pub mod password_verifier;
pub mod token;

// Re-exports
pub use config::SecurityConfig;
pub use login::{LoggedInUser, LoginInput, LoginOutput, LoginUseCase};
pub use token::{JwtPayload, TokenClaims, TokenSigner};
