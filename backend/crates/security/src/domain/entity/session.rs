//! Session Entity
//!
//! Record of an issued login token, persisted for audit and revocation.

use std::fmt;

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, UserAccountId};

/// Session created on successful login
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub account_id: AccountId,
    pub user_id: UserAccountId,
    /// The signed token handed to the client
    pub token: String,
    pub ip_address: String,
    pub user_agent: String,
    /// Matches the token's `exp` claim
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account_id", &self.account_id)
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .field("ip_address", &self.ip_address)
            .field("user_agent", &self.user_agent)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            account_id: AccountId::new(1),
            user_id: UserAccountId::new(2),
            token: "eyJhbGciOiJIUzI1NiJ9.payload.sig".to_string(),
            ip_address: "127.0.0.1".to_string(),
            user_agent: "test".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_debug_hides_token() {
        let output = format!("{:?}", session(Utc::now()));
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("eyJhbGci"));
    }
}
