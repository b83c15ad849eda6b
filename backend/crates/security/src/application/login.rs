//! Login Use Case
//!
//! Verifies credentials, issues a signed token and records a session.

use std::sync::Arc;

use kernel::id::UserAccountId;
use platform::client::ClientInfo;
use platform::password::ClearTextPassword;

use crate::application::config::SecurityConfig;
use crate::application::password_verifier::verify_password;
use crate::application::token::{JwtPayload, TokenSigner};
use crate::domain::entity::session::Session;
use crate::domain::repository::{CredentialStore, LoginLookup, SessionStore};
use crate::error::{SecurityError, SecurityResult};

/// Login input (already validated)
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: ClearTextPassword,
    pub remember_me: bool,
    pub client: ClientInfo,
}

/// Identity returned with the token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedInUser {
    pub id: UserAccountId,
    pub name: String,
    pub email: String,
}

/// Login output
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub token: String,
    pub user: LoggedInUser,
}

/// Login use case
pub struct LoginUseCase<C, S>
where
    C: CredentialStore,
    S: SessionStore,
{
    credentials: Arc<C>,
    sessions: Arc<S>,
    signer: Arc<TokenSigner>,
    config: Arc<SecurityConfig>,
}

impl<C, S> LoginUseCase<C, S>
where
    C: CredentialStore,
    S: SessionStore,
{
    pub fn new(
        credentials: Arc<C>,
        sessions: Arc<S>,
        signer: Arc<TokenSigner>,
        config: Arc<SecurityConfig>,
    ) -> Self {
        Self {
            credentials,
            sessions,
            signer,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> SecurityResult<LoginOutput> {
        let LoginInput {
            email,
            password,
            remember_me,
            client,
        } = input;

        let user = match self.credentials.fetch_for_login(&email, &client).await? {
            LoginLookup::Found(user) => user,
            LoginLookup::NotFound => return Err(SecurityError::InvalidCredentials),
            LoginLookup::Locked { until } => return Err(SecurityError::AccountLocked { until }),
        };

        let password_ok = verify_password(user.password_hash.clone(), password).await?;

        // Recorded for failures too: the store drives lockout from these
        self.credentials
            .record_login_status(user.user_id, password_ok, &client)
            .await?;

        if !password_ok {
            tracing::debug!(
                user_id = %user.user_id,
                failed_login_attempts = user.failed_login_attempts,
                "Password mismatch"
            );
            return Err(SecurityError::InvalidCredentials);
        }

        let payload = JwtPayload {
            id: user.user_id,
            id_account: user.account_id,
            email: user.email.clone(),
        };
        let token = self.signer.sign(&payload, self.config.ttl_for(remember_me))?;

        // Session expiry is read back from the signed token so both agree
        let expires_at = self.signer.decode(&token)?.expires_at();

        let session = Session {
            account_id: user.account_id,
            user_id: user.user_id,
            token: token.clone(),
            ip_address: client.ip,
            user_agent: client.user_agent,
            expires_at,
        };
        self.sessions.create_session(&session).await?;

        tracing::info!(
            user_id = %user.user_id,
            account_id = %user.account_id,
            remember_me,
            "User signed in"
        );

        Ok(LoginOutput {
            token,
            user: LoggedInUser {
                id: user.user_id,
                name: user.name,
                email: user.email,
            },
        })
    }
}
