//! HTTP adapters for NVC facilitation
//!
//! Exposes the conversation, summary and resource endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::NvcAppState;
pub use routes::nvc_router;
