//! Client identification utilities
//!
//! Resolves the caller's IP address and User-Agent for audit and lockout
//! bookkeeping. Both fall back to `"unknown"` when they cannot be determined.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};

/// Placeholder recorded when the IP or User-Agent is unavailable
pub const UNKNOWN: &str = "unknown";

/// Whether `X-Forwarded-For` may be trusted for the client IP
///
/// Inserted as a request extension by the server. Absent means
/// [`ProxyPolicy::Direct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyPolicy {
    /// Use the socket peer address only
    #[default]
    Direct,
    /// Use the first `X-Forwarded-For` entry, falling back to the peer address
    TrustForwarded,
}

/// Caller identity as seen by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Client IP address, or `"unknown"`
    pub ip: String,
    /// Raw User-Agent header, or `"unknown"`
    pub user_agent: String,
}

impl ClientInfo {
    pub fn new(ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Resolve from request headers and the peer address
    pub fn from_headers(headers: &HeaderMap, peer: Option<IpAddr>, policy: ProxyPolicy) -> Self {
        let ip = match policy {
            ProxyPolicy::TrustForwarded => extract_client_ip(headers, peer),
            ProxyPolicy::Direct => peer,
        };

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN);

        Self {
            ip: ip.map(|ip| ip.to_string()).unwrap_or_else(|| UNKNOWN.to_string()),
            user_agent: user_agent.to_string(),
        }
    }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        let policy = parts
            .extensions
            .get::<ProxyPolicy>()
            .copied()
            .unwrap_or_default();

        Ok(ClientInfo::from_headers(&parts.headers, peer, policy))
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // Check X-Forwarded-For header (first IP in the list)
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, None);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct));
        assert_eq!(ip, Some(direct));
    }

    #[test]
    fn test_direct_policy_ignores_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        let peer: IpAddr = "10.1.1.1".parse().unwrap();

        let info = ClientInfo::from_headers(&headers, Some(peer), ProxyPolicy::Direct);
        assert_eq!(info, ClientInfo::new("10.1.1.1", "curl/8.0"));

        let info = ClientInfo::from_headers(&headers, Some(peer), ProxyPolicy::TrustForwarded);
        assert_eq!(info.ip, "203.0.113.9");
    }

    #[test]
    fn test_missing_values_fall_back_to_unknown() {
        let info = ClientInfo::from_headers(&HeaderMap::new(), None, ProxyPolicy::Direct);
        assert_eq!(info, ClientInfo::new(UNKNOWN, UNKNOWN));
    }

    #[tokio::test]
    async fn test_extractor_reads_connect_info_and_policy() {
        let peer: SocketAddr = "192.0.2.4:5555".parse().unwrap();
        let request = Request::builder()
            .header(header::USER_AGENT, "Mozilla/5.0 Test Browser")
            .header("x-forwarded-for", "198.51.100.7")
            .extension(ConnectInfo(peer))
            .extension(ProxyPolicy::TrustForwarded)
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let info = ClientInfo::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(info.ip, "198.51.100.7");
        assert_eq!(info.user_agent, "Mozilla/5.0 Test Browser");
    }
}
