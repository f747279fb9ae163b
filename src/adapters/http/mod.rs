//! HTTP adapters - REST API implementations.
//!
//! Each area has its own HTTP adapter for endpoint exposure. `build_router`
//! assembles them and applies the shared middleware stack.

pub mod error;
pub mod middleware;
pub mod nvc;
pub mod system;

// Re-export key types for convenience
pub use nvc::nvc_router;
pub use nvc::NvcAppState;
pub use system::system_router;

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Prefix for versioned API routes.
pub const API_PREFIX: &str = "/api/v1";

/// Builds the full application router.
///
/// Layers, innermost first: panic catcher, timeout, host check (only when
/// `allowed_hosts` is restricted), security headers, request-id propagation, tracing, request-id generation, compression, CORS.
pub fn build_router(state: NvcAppState, config: &ServerConfig) -> Router {
    let mut routes = Router::new()
        .merge(system_router())
        .nest(API_PREFIX, nvc_router().with_state(state))
        .layer(middleware::catch_panic_layer())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            config.request_timeout_secs,
        )));

    let hosts = middleware::TrustedHosts::new(config.allowed_hosts_list());
    if !hosts.allows_any() {
        routes = routes.layer(axum::middleware::from_fn_with_state(
            Arc::new(hosts),
            middleware::trusted_host_middleware,
        ));
    }

    middleware::with_security_headers(routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CompressionLayer::new())
        .layer(middleware::cors_layer(config))
}
