//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{session::Session, user_account::UserAccount};
pub use repository::{CredentialStore, LoginLookup, SessionStore};
