//! Login Token Issuance and Verification
//!
//! HS256 JWTs carrying the user id, account id and email. The claim names
//! (`id`, `idAccount`, `email`, `iat`, `exp`) are read by existing clients.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kernel::id::{AccountId, UserAccountId};
use serde::{Deserialize, Serialize};

use crate::application::config::MAX_TOKEN_TTL;
use crate::error::SecurityResult;

/// Identity embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtPayload {
    pub id: UserAccountId,
    #[serde(rename = "idAccount")]
    pub id_account: AccountId,
    pub email: String,
}

/// Full claim set: payload plus issued-at and expiry (Unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub payload: JwtPayload,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    /// Expiry as a timestamp, falling back to now for out-of-range values
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Signs and verifies login tokens with a shared secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Sign a token for `payload` valid for `ttl` from now
    ///
    /// `ttl` is capped at [`MAX_TOKEN_TTL`] so `exp` stays a valid timestamp.
    pub fn sign(&self, payload: &JwtPayload, ttl: Duration) -> SecurityResult<String> {
        let now = Utc::now().timestamp();
        let ttl = ttl.min(MAX_TOKEN_TTL).as_secs() as i64;
        let claims = TokenClaims {
            payload: payload.clone(),
            iat: now,
            exp: now + ttl,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the claims
    pub fn decode(&self, token: &str) -> SecurityResult<TokenClaims> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}
