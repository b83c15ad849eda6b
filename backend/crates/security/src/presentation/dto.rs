//! Data Transfer Objects

use kernel::id::UserAccountId;
use platform::password::ClearTextPassword;
use serde::Serialize;

use crate::application::login::{LoggedInUser, LoginOutput};

// ============================================================================
// Login
// ============================================================================

/// Validated login request body
///
/// Built by the `FromRequest` impl in `presentation::validation`.
#[derive(Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: ClearTextPassword,
    /// Defaults to `false` when absent
    pub remember_me: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfoResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfoResponse {
    pub id: UserAccountId,
    pub name: String,
    pub email: String,
}

impl From<LoggedInUser> for UserInfoResponse {
    fn from(user: LoggedInUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<LoginOutput> for LoginResponse {
    fn from(output: LoginOutput) -> Self {
        Self {
            token: output.token,
            user: output.user.into(),
        }
    }
}
