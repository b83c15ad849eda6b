//! Internal Route Access Gate
//!
//! Runs in front of every `/internal` route. The default policy lets
//! requests through; the bearer policy requires a valid login token.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::token::{JwtPayload, TokenSigner};
use crate::error::{SecurityError, SecurityResult};

/// Access policy for internal routes
#[derive(Clone, Debug)]
pub enum InternalAccess {
    /// Allow every request
    PassThrough,
    /// Require `Authorization: Bearer <token>` signed by this signer
    Bearer(Arc<TokenSigner>),
}

/// Identity of a caller that passed the bearer gate
///
/// Inserted as a request extension for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub JwtPayload);

impl InternalAccess {
    /// Decide whether a request with these headers may proceed
    pub fn check(&self, headers: &HeaderMap) -> SecurityResult<Option<AuthenticatedUser>> {
        match self {
            InternalAccess::PassThrough => Ok(None),
            InternalAccess::Bearer(signer) => {
                let token = bearer_token(headers).ok_or(SecurityError::MissingToken)?;
                let claims = signer
                    .decode(token)
                    .map_err(|_| SecurityError::InvalidToken)?;
                Ok(Some(AuthenticatedUser(claims.payload)))
            }
        }
    }
}

/// Middleware applying an [`InternalAccess`] policy
pub async fn require_internal_access(
    State(access): State<InternalAccess>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match access.check(req.headers()) {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(None) => {
            tracing::debug!(path = %req.uri().path(), "Internal route access without authentication");
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use kernel::id::{AccountId, UserAccountId};
    use std::time::Duration;

    fn signer() -> Arc<TokenSigner> {
        Arc::new(TokenSigner::new("gate-secret"))
    }

    fn payload() -> JwtPayload {
        JwtPayload {
            id: UserAccountId::new(1),
            id_account: AccountId::new(2),
            email: "ops@example.com".to_string(),
        }
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(InternalAccess::PassThrough.check(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_bearer_missing_token() {
        let err = InternalAccess::Bearer(signer())
            .check(&HeaderMap::new())
            .unwrap_err();
        assert!(matches!(err, SecurityError::MissingToken));
        assert_eq!(err.to_string(), "Unauthorized: No token provided");
    }

    #[test]
    fn test_bearer_invalid_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer not.a.jwt"));

        let err = InternalAccess::Bearer(signer()).check(&headers).unwrap_err();
        assert!(matches!(err, SecurityError::InvalidToken));
    }

    #[test]
    fn test_bearer_valid_token() {
        let signer = signer();
        let token = signer.sign(&payload(), Duration::from_secs(60)).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let user = InternalAccess::Bearer(signer).check(&headers).unwrap();
        assert_eq!(user, Some(AuthenticatedUser(payload())));
    }

    #[test]
    fn test_non_bearer_scheme_is_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));

        let err = InternalAccess::Bearer(signer()).check(&headers).unwrap_err();
        assert!(matches!(err, SecurityError::MissingToken));
    }
}
