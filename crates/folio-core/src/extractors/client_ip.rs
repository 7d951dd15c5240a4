use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use crate::config::Config;
use crate::error::FolioError;
use crate::guard::normalize_identity;

/// Client identity used as the throttling key.
///
/// The peer address of the connection, or the first `X-Forwarded-For` entry
/// (then `X-Real-IP`) when `TRUST_PROXY_HEADERS` is on. Falls back to
/// `"unknown"` when nothing usable is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = FolioError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let trust_proxy = parts
            .extensions
            .get::<Arc<Config>>()
            .is_some_and(|c| c.trust_proxy_headers);

        let from_headers = trust_proxy
            .then(|| forwarded_ip(&parts.headers))
            .flatten();

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let raw = from_headers.or(peer).unwrap_or_default();
        Ok(ClientIp(normalize_identity(&raw)))
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}
