//! Host header validation.
//!
//! Rejects requests whose `Host` is not in `server.allowed_hosts` with
//! `400 Bad Request`. Patterns are exact hostnames or `*.domain` wildcards
//! that match any subdomain. Ports are ignored.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use std::sync::Arc;
//!
//! let hosts = Arc::new(TrustedHosts::new(vec!["localhost".into()]));
//!
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(middleware::from_fn_with_state(hosts, trusted_host_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;

/// Accepted host patterns, lowercased.
#[derive(Debug, Clone, Default)]
pub struct TrustedHosts {
    patterns: Vec<String>,
}

impl TrustedHosts {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns: patterns.into_iter().map(|p| p.to_ascii_lowercase()).collect(),
        }
    }

    /// True when no patterns are set or one of them is `*`.
    pub fn allows_any(&self) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p == "*")
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        if self.allows_any() {
            return true;
        }

        let host = strip_port(host).to_ascii_lowercase();
        self.patterns.iter().any(|pattern| match pattern.strip_prefix("*.") {
            Some(domain) => host
                .strip_suffix(domain)
                .is_some_and(|rest| rest.ends_with('.')),
            None => *pattern == host,
        })
    }
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literal
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.split(':').next().unwrap_or(host)
}

/// Rejects requests for hosts outside the trusted list.
pub async fn trusted_host_middleware(
    State(hosts): State<Arc<TrustedHosts>>,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().host())
        .unwrap_or_default()
        .to_string();

    if !hosts.is_allowed(&host) {
        tracing::warn!(host = %host, "Rejected request for untrusted host");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::invalid_host(&host)),
        )
            .into_response();
    }

    next.run(request).await
}
