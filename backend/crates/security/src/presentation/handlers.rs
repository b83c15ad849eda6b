//! HTTP Handlers

use std::sync::Arc;

use axum::extract::State;
use kernel::response::{SuccessResponse, success_response};
use platform::client::ClientInfo;

use crate::application::config::SecurityConfig;
use crate::application::token::TokenSigner;
use crate::application::{LoginInput, LoginUseCase};
use crate::domain::repository::{CredentialStore, SessionStore};
use crate::error::SecurityResult;
use crate::presentation::dto::{LoginRequest, LoginResponse};

/// Shared state for security handlers
#[derive(Clone)]
pub struct SecurityAppState<R>
where
    R: CredentialStore + SessionStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub signer: Arc<TokenSigner>,
    pub config: Arc<SecurityConfig>,
}

impl<R> SecurityAppState<R>
where
    R: CredentialStore + SessionStore + Clone + Send + Sync + 'static,
{
    /// Build state with a signer derived from the configured secret
    pub fn new(repo: R, config: SecurityConfig) -> Self {
        let signer = TokenSigner::new(&config.jwt_secret);
        Self {
            repo: Arc::new(repo),
            signer: Arc::new(signer),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/v1/external/security/login
pub async fn login<R>(
    State(state): State<SecurityAppState<R>>,
    client: ClientInfo,
    req: LoginRequest,
) -> SecurityResult<SuccessResponse<LoginResponse>>
where
    R: CredentialStore + SessionStore + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
        remember_me: req.remember_me,
        client,
    };

    let output = use_case.execute(input).await?;

    Ok(success_response(LoginResponse::from(output)))
}
