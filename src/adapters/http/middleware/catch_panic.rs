//! Turns handler panics into a JSON `500 Internal Server Error`.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower_http::catch_panic::CatchPanicLayer;

use crate::adapters::http::error::ErrorResponse;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Layer that logs the panic and answers with a generic error body.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    let error_id = uuid::Uuid::new_v4();

    tracing::error!(error_id = %error_id, panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(
            ErrorResponse::internal("Internal server error")
                .with_details(serde_json::json!({ "errorId": error_id.to_string() })),
        ),
    )
        .into_response()
}
