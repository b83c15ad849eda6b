//! In-Memory Store
//!
//! Stand-in for the PostgreSQL store in tests. Records every status update
//! and session so callers can assert on them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use kernel::id::{AccountId, UserAccountId};
use platform::client::ClientInfo;
use platform::password::{ClearTextPassword, HashScheme, StoredPasswordHash};

use crate::domain::entity::{session::Session, user_account::UserAccount};
use crate::domain::repository::{CredentialStore, LoginLookup, SessionStore};
use crate::error::{SecurityError, SecurityResult};

/// A recorded `record_login_status` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStatusRecord {
    pub user_id: UserAccountId,
    pub success: bool,
    pub ip_address: String,
    pub user_agent: String,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<String, UserAccount>,
    locked: HashMap<String, String>,
    login_statuses: Vec<LoginStatusRecord>,
    sessions: Vec<Session>,
    unavailable: bool,
}

/// In-memory credential and session store
#[derive(Clone, Default)]
pub struct InMemorySecurityStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemorySecurityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user, keyed case-insensitively by email
    pub fn with_user(self, user: UserAccount) -> Self {
        self.insert_user(user);
        self
    }

    pub fn insert_user(&self, user: UserAccount) {
        self.state().users.insert(user.email.to_lowercase(), user);
    }

    /// Report the account as locked until `until`
    pub fn lock(&self, email: &str, until: impl Into<String>) {
        self.state().locked.insert(email.to_lowercase(), until.into());
    }

    /// Make every call fail as if the database were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    pub fn login_statuses(&self) -> Vec<LoginStatusRecord> {
        self.state().login_statuses.clone()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.state().sessions.clone()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(state: &MemoryState) -> SecurityResult<()> {
        if state.unavailable {
            return Err(SecurityError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

impl CredentialStore for InMemorySecurityStore {
    async fn fetch_for_login(
        &self,
        email: &str,
        _client: &ClientInfo,
    ) -> SecurityResult<LoginLookup> {
        let state = self.state();
        Self::check_available(&state)?;

        let key = email.to_lowercase();
        if let Some(until) = state.locked.get(&key) {
            return Ok(LoginLookup::Locked {
                until: until.clone(),
            });
        }

        Ok(state
            .users
            .get(&key)
            .cloned()
            .map_or(LoginLookup::NotFound, LoginLookup::Found))
    }

    async fn record_login_status(
        &self,
        user_id: UserAccountId,
        success: bool,
        client: &ClientInfo,
    ) -> SecurityResult<()> {
        let mut state = self.state();
        Self::check_available(&state)?;

        state.login_statuses.push(LoginStatusRecord {
            user_id,
            success,
            ip_address: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        });
        Ok(())
    }
}

impl SessionStore for InMemorySecurityStore {
    async fn create_session(&self, session: &Session) -> SecurityResult<()> {
        let mut state = self.state();
        Self::check_available(&state)?;

        state.sessions.push(session.clone());
        Ok(())
    }
}

/// Build a user whose password is hashed with a low-cost bcrypt
///
/// # Panics
/// If hashing fails.
pub fn test_user(
    user_id: i64,
    account_id: i64,
    name: &str,
    email: &str,
    password: &str,
) -> UserAccount {
    let password_hash: StoredPasswordHash = ClearTextPassword::new(password.to_string())
        .hash(HashScheme::Bcrypt { cost: 4 })
        .expect("bcrypt hashing of a test password");

    UserAccount {
        user_id: UserAccountId::new(user_id),
        account_id: AccountId::new(account_id),
        name: name.to_string(),
        email: email.to_string(),
        password_hash,
        failed_login_attempts: 0,
    }
}
