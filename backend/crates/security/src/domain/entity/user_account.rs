//! User Account Entity
//!
//! The login identity returned by the credential store.

use kernel::id::{AccountId, UserAccountId};
use platform::password::StoredPasswordHash;

/// User account as loaded for a login attempt
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Login identity key
    pub user_id: UserAccountId,
    /// Owning account (tenant)
    pub account_id: AccountId,
    /// Display name
    pub name: String,
    /// Email as stored, echoed back on success
    pub email: String,
    /// Stored password hash
    pub password_hash: StoredPasswordHash,
    /// Consecutive failures counted by the store
    pub failed_login_attempts: i32,
}
