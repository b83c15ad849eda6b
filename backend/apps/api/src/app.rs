//! Router Assembly
//!
//! Routes, fallback and the HTTP middleware stack shared by every endpoint.

use std::any::Any;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, OriginalUri, Request};
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use kernel::error::{app_error::AppError, report::ErrorReport};
use kernel::response::timestamp;
use platform::client::ProxyPolicy;
use security::domain::repository::{CredentialStore, SessionStore};
use security::{InternalAccess, TokenSigner, internal_router, security_router_generic};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{InternalAuthMode, ServerConfig};

/// Maximum accepted request body
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Build the full application router
///
/// `internal_routes` are mounted under `/api/{version}/internal` behind the
/// configured access gate.
pub fn build_app<R>(config: &ServerConfig, repo: R, internal_routes: Router) -> Router
where
    R: CredentialStore + SessionStore + Clone + Send + Sync + 'static,
{
    let prefix = config.api_prefix();
    let access = match config.internal_auth {
        InternalAuthMode::None => InternalAccess::PassThrough,
        InternalAuthMode::Jwt => {
            InternalAccess::Bearer(Arc::new(TokenSigner::new(&config.security.jwt_secret)))
        }
    };
    let proxy_policy = if config.trust_proxy {
        ProxyPolicy::TrustForwarded
    } else {
        ProxyPolicy::Direct
    };

    let router = Router::new()
        .route("/health", get(health))
        .nest(
            &format!("{prefix}/external/security"),
            security_router_generic(repo, config.security.clone()),
        )
        .nest(
            &format!("{prefix}/internal"),
            internal_router(internal_routes, access),
        )
        .fallback(not_found);

    with_middleware(router, config, proxy_policy)
}

/// Apply the middleware stack, innermost first
fn with_middleware(router: Router, config: &ServerConfig, proxy_policy: ProxyPolicy) -> Router {
    router
        .layer(Extension(proxy_policy))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::from_fn(log_server_errors))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(config.cors_origins.as_deref()))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// CORS policy: an explicit allowlist with credentials, or any origin without
/// when no list (or a list containing `*`) is configured
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ]);

    match origins {
        Some(origins) if !origins.iter().any(|origin| origin == "*") => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect();
            base.allow_origin(origins).allow_credentials(true)
        }
        _ => base.allow_origin(AnyOrigin),
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: timestamp(),
    })
}

/// Fallback for unmatched routes
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    AppError::not_found(format!("Not Found: {method} {target}"))
}

// ============================================================================
// Middleware
// ============================================================================

/// Log server errors with the request they belong to
///
/// Handlers attach an [`ErrorReport`] to 5xx responses; the caller only ever
/// sees the generic message.
pub async fn log_server_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        tracing::error!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            error = %report,
            "Request failed"
        );
    }

    response
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    AppError::internal("Internal Server Error").into_response()
}
