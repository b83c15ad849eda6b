//! Application Configuration
//!
//! Token settings for the login flow.

use std::fmt;
use std::time::Duration;

/// Signing secret used when none is configured. Refused in production.
pub const DEFAULT_JWT_SECRET: &str = "default_secret_key";

/// Longest accepted token lifetime (100 years)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// Security application configuration
#[derive(Clone)]
pub struct SecurityConfig {
    /// HMAC secret for HS256 token signing
    pub jwt_secret: String,
    /// Token lifetime without "Remember Me" (2 hours)
    pub token_ttl: Duration,
    /// Token lifetime with "Remember Me" (30 days)
    pub remember_me_token_ttl: Duration,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(2 * 3600),                  // 2 hours
            remember_me_token_ttl: Duration::from_secs(30 * 24 * 3600), // 30 days
        }
    }
}

impl SecurityConfig {
    /// Create config for development (built-in secret)
    pub fn development() -> Self {
        Self::default()
    }

    /// Token lifetime for a login
    pub fn ttl_for(&self, remember_me: bool) -> Duration {
        if remember_me {
            self.remember_me_token_ttl
        } else {
            self.token_ttl
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("remember_me_token_ttl", &self.remember_me_token_ttl)
            .finish()
    }
}
