//! Route definitions for NVC endpoints

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    list_examples, list_feelings, list_needs, process_conversation, summarize_conversation,
    NvcAppState,
};

/// Create NVC router with all endpoints
///
/// # Endpoints
///
/// - `POST /nvc/conversation` - Process one conversation turn
/// - `POST /nvc/conversation/summary` - Summarize a history
/// - `GET /nvc/feelings` - Feelings vocabulary
/// - `GET /nvc/needs` - Universal needs
/// - `GET /nvc/examples` - Practice examples
pub fn nvc_router() -> Router<NvcAppState> {
    Router::new()
        .route("/nvc/conversation", post(process_conversation))
        .route("/nvc/conversation/summary", post(summarize_conversation))
        .route("/nvc/feelings", get(list_feelings))
        .route("/nvc/needs", get(list_needs))
        .route("/nvc/examples", get(list_examples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::ai::MockAIProvider;
    use crate::application::ProcessMessageSettings;
    use crate::domain::nvc::CompletionGate;

    fn rules_only_app() -> Router {
        let state = NvcAppState::new(
            CompletionGate::default(),
            None,
            ProcessMessageSettings::default(),
        );
        nvc_router().with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn conversation_endpoint_classifies_feeling() {
        let response = rules_only_app()
            .oneshot(post_json(
                "/nvc/conversation",
                serde_json::json!({ "message": "I feel frustrated", "conversationHistory": [] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["detectedStage"], "feeling");
        assert_eq!(json["currentStage"], "need");
        assert_eq!(json["complete"], false);
        assert_eq!(json["source"], "rules");
    }

    #[tokio::test]
    async fn conversation_endpoint_uses_ai_turn() {
        let provider = MockAIProvider::new().with_turn("observation", "What did you see?");
        let state = NvcAppState::new(
            CompletionGate::default(),
            Some(Arc::new(provider.clone())),
            ProcessMessageSettings::default(),
        );

        let response = nvc_router()
            .with_state(state)
            .oneshot(post_json(
                "/nvc/conversation",
                serde_json::json!({ "message": "My roommate left dishes out" }),
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["detectedStage"], "observation");
        assert_eq!(json["responseText"], "What did you see?");
        assert_eq!(json["source"], "ai");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn oversized_message_is_rejected() {
        let settings = ProcessMessageSettings {
            max_message_length: 5,
            ..Default::default()
        };
        let state = NvcAppState::new(CompletionGate::default(), None, settings);

        let response = nvc_router()
            .with_state(state)
            .oneshot(post_json(
                "/nvc/conversation",
                serde_json::json!({ "message": "far too long" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["details"]["max"], 5);
    }

    #[tokio::test]
    async fn summary_endpoint_returns_sections() {
        let response = rules_only_app()
            .oneshot(post_json(
                "/nvc/conversation/summary",
                serde_json::json!({ "conversationHistory": ["I feel lonely"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["sections"]["feeling"], "I feel lonely");
        assert!(json["summary"].as_str().unwrap().contains("I feel lonely"));
    }

    #[tokio::test]
    async fn resource_endpoints_return_lists() {
        for (uri, key) in [
            ("/nvc/feelings", "feelings"),
            ("/nvc/needs", "needs"),
            ("/nvc/examples", "examples"),
        ] {
            let response = rules_only_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let json = body_json(response).await;
            assert!(!json[key].as_array().unwrap().is_empty(), "{uri}");
        }
    }

    #[tokio::test]
    async fn malformed_json_is_client_error() {
        let response = rules_only_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/nvc/conversation")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
