//! Service info and health endpoints
//!
//! - `GET /` - Service banner and version
//! - `GET /health` - Liveness check

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

/// Display name reported by the health endpoint.
pub const APP_NAME: &str = "NVC AI Facilitator";

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub app_name: &'static str,
    pub version: &'static str,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "NVC AI Facilitator API",
        version: VERSION,
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        app_name: APP_NAME,
        version: VERSION,
    })
}

pub fn system_router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}
