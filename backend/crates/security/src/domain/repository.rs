//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use kernel::id::UserAccountId;
use platform::client::ClientInfo;

use crate::domain::entity::{session::Session, user_account::UserAccount};
use crate::error::SecurityResult;

/// Result of looking up an account for a login attempt
#[derive(Debug, Clone)]
pub enum LoginLookup {
    /// Account exists and is not locked
    Found(UserAccount),
    /// No account for this email
    NotFound,
    /// Account is locked until the given store-formatted time
    Locked { until: String },
}

/// Credential store trait
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Fetch the account for `email` and check its lockout state
    ///
    /// The store also records the attempt's client IP and User-Agent.
    async fn fetch_for_login(&self, email: &str, client: &ClientInfo)
    -> SecurityResult<LoginLookup>;

    /// Record the outcome of a password check
    ///
    /// The store updates its failure counter and lockout window.
    async fn record_login_status(
        &self,
        user_id: UserAccountId,
        success: bool,
        client: &ClientInfo,
    ) -> SecurityResult<()>;
}

/// Session store trait
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Persist a session for an issued token
    async fn create_session(&self, session: &Session) -> SecurityResult<()>;
}
