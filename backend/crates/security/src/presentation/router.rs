//! Security Router

use axum::{Router, middleware, routing::post};

use crate::application::config::SecurityConfig;
use crate::domain::repository::{CredentialStore, SessionStore};
use crate::infra::postgres::PgSecurityStore;
use crate::presentation::handlers::{self, SecurityAppState};
use crate::presentation::middleware::{InternalAccess, require_internal_access};

/// Create the security router with the PostgreSQL store
///
/// Mounted under `/api/{version}/external/security`.
pub fn security_router(repo: PgSecurityStore, config: SecurityConfig) -> Router {
    security_router_generic(repo, config)
}

/// Create a security router for any store implementation
pub fn security_router_generic<R>(repo: R, config: SecurityConfig) -> Router
where
    R: CredentialStore + SessionStore + Clone + Send + Sync + 'static,
{
    let state = SecurityAppState::new(repo, config);

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .with_state(state)
}

/// Put `routes` behind the internal access gate
///
/// Mounted under `/api/{version}/internal`. Paths with no matching route
/// fall through to the outer 404 handler.
pub fn internal_router(routes: Router, access: InternalAccess) -> Router {
    routes.layer(middleware::from_fn_with_state(
        access,
        require_internal_access,
    ))
}
