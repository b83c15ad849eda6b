//! PostgreSQL Store Implementation
//!
//! All reads and writes go through stored routines in the `security` schema:
//! - `sp_user_account_login(email, password, ip, user_agent)` returns the
//!   account row, or raises `AccountLocked:<until>` / `InvalidCredentials`
//! - `sp_update_login_status(user_id, success, ip, user_agent)`
//! - `sp_user_session_create(account_id, user_id, token, ip, user_agent, expires_at)`

use kernel::id::{AccountId, UserAccountId};
use platform::client::ClientInfo;
use platform::password::StoredPasswordHash;
use sqlx::PgPool;

use crate::domain::entity::{session::Session, user_account::UserAccount};
use crate::domain::repository::{CredentialStore, LoginLookup, SessionStore};
use crate::error::SecurityResult;

const LOCKED_PREFIX: &str = "AccountLocked";
const INVALID_CREDENTIALS_PREFIX: &str = "InvalidCredentials";

/// PostgreSQL-backed security store
#[derive(Clone)]
pub struct PgSecurityStore {
    pool: PgPool,
}

impl PgSecurityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Credential Store Implementation
// ============================================================================

impl CredentialStore for PgSecurityStore {
    async fn fetch_for_login(
        &self,
        email: &str,
        client: &ClientInfo,
    ) -> SecurityResult<LoginLookup> {
        // The password parameter is part of the routine's signature but unused
        // by it; clear text is never sent to the database.
        let result = sqlx::query_as::<_, UserAccountRow>(
            r#"
            SELECT
                id_user_account,
                id_account,
                name,
                email,
                password_hash,
                failed_login_attempts
            FROM security.sp_user_account_login($1, $2, $3, $4)
            "#,
        )
        .bind(email)
        .bind(None::<String>)
        .bind(&client.ip)
        .bind(&client.user_agent)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => Ok(LoginLookup::Found(row.into_user_account())),
            Ok(None) => Ok(LoginLookup::NotFound),
            Err(sqlx::Error::Database(db_err)) => match classify_raised_message(db_err.message()) {
                Some(lookup) => Ok(lookup),
                None => Err(sqlx::Error::Database(db_err).into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn record_login_status(
        &self,
        user_id: UserAccountId,
        success: bool,
        client: &ClientInfo,
    ) -> SecurityResult<()> {
        sqlx::query("CALL security.sp_update_login_status($1, $2, $3, $4)")
            .bind(user_id.get())
            .bind(success)
            .bind(&client.ip)
            .bind(&client.user_agent)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for PgSecurityStore {
    async fn create_session(&self, session: &Session) -> SecurityResult<()> {
        sqlx::query("CALL security.sp_user_session_create($1, $2, $3, $4, $5, $6)")
            .bind(session.account_id.get())
            .bind(session.user_id.get())
            .bind(&session.token)
            .bind(&session.ip_address)
            .bind(&session.user_agent)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Raised message classification
// ============================================================================

/// Map a message raised by the login routine onto a lookup outcome
///
/// `AccountLocked:<until>` keeps everything after the first colon, so
/// times like `2024-01-01 10:15:00` survive intact.
fn classify_raised_message(message: &str) -> Option<LoginLookup> {
    if let Some(rest) = message.strip_prefix(LOCKED_PREFIX) {
        let until = rest.strip_prefix(':').unwrap_or(rest).trim();
        return Some(LoginLookup::Locked {
            until: until.to_string(),
        });
    }

    if message.starts_with(INVALID_CREDENTIALS_PREFIX) {
        return Some(LoginLookup::NotFound);
    }

    None
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserAccountRow {
    id_user_account: i64,
    id_account: i64,
    name: String,
    email: String,
    password_hash: String,
    failed_login_attempts: i32,
}

impl UserAccountRow {
    fn into_user_account(self) -> UserAccount {
        UserAccount {
            user_id: UserAccountId::new(self.id_user_account),
            account_id: AccountId::new(self.id_account),
            name: self.name,
            email: self.email,
            password_hash: StoredPasswordHash::from_stored(self.password_hash),
            failed_login_attempts: self.failed_login_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_message_keeps_full_time() {
        match classify_raised_message("AccountLocked:2024-01-01 10:15:00") {
            Some(LoginLookup::Locked { until }) => assert_eq!(until, "2024-01-01 10:15:00"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_locked_without_time() {
        match classify_raised_message("AccountLocked") {
            Some(LoginLookup::Locked { until }) => assert_eq!(until, ""),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert!(matches!(
            classify_raised_message("InvalidCredentials"),
            Some(LoginLookup::NotFound)
        ));
    }

    #[test]
    fn test_other_messages_are_errors() {
        assert!(classify_raised_message("deadlock detected").is_none());
        assert!(classify_raised_message("").is_none());
    }

    #[test]
    fn test_row_conversion() {
        let row = UserAccountRow {
            id_user_account: 11,
            id_account: 4,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuu".to_string(),
            failed_login_attempts: 2,
        };

        let user = row.into_user_account();
        assert_eq!(user.user_id.get(), 11);
        assert_eq!(user.account_id.get(), 4);
        assert_eq!(user.failed_login_attempts, 2);
        assert!(user.password_hash.scheme().is_some());
    }
}
