use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response, header},
    middleware::Next,
    response::IntoResponse,
};

use crate::error::AppError;

/// Host names the server answers to. Empty disables the check.
#[derive(Clone, Debug, Default)]
pub struct AllowedHosts(pub Arc<Vec<String>>);

impl AllowedHosts {
    pub fn new(hosts: &[String]) -> Self {
        Self(Arc::new(
            hosts.iter().map(|h| h.trim().to_ascii_lowercase()).collect(),
        ))
    }

    pub fn allows(&self, host: &str) -> bool {
        self.0.is_empty() || self.0.iter().any(|allowed| allowed == host)
    }
}

/// Strip the port from a Host header value, keeping IPv6 brackets.
fn host_name(value: &str) -> String {
    let value = value.trim();

    let name = if value.starts_with('[') {
        value.split_once(']').map_or(value, |(ip, _)| ip)
    } else {
        value.rsplit_once(':').map_or(value, |(name, _)| name)
    };

    name.trim_start_matches('[').to_ascii_lowercase()
}

/// Reject requests whose Host header is not allowlisted
/// - Health check routes are exempt
pub async fn host_allowlist_middleware(
    State(allowed): State<AllowedHosts>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let path = req.uri().path();
    if path == "/health" || path == "/ready" {
        return next.run(req).await;
    }

    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host())
        .map(host_name)
        .unwrap_or_default();

    if !allowed.allows(&host) {
        return AppError::InvalidHost(host).into_response();
    }

    next.run(req).await
}
