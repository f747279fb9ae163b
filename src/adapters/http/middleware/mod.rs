//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `catch_panic` - JSON 500 body when a handler panics
//! - `cors` - CORS policy from server configuration
//! - `security_headers` - Hardening headers on every response
//! - `trusted_host` - `Host` header check against `server.allowed_hosts`

pub mod catch_panic;
pub mod cors;
pub mod security_headers;
pub mod trusted_host;

pub use catch_panic::catch_panic_layer;
pub use cors::cors_layer;
pub use security_headers::{with_security_headers, SECURITY_HEADERS};
pub use trusted_host::{trusted_host_middleware, TrustedHosts};
