//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - LLM providers (OpenAI, Anthropic, failover, mock)
//! - `http` - axum routes, DTOs and middleware

pub mod ai;
pub mod http;

pub use ai::build_ai_provider;
pub use http::{build_router, NvcAppState};
