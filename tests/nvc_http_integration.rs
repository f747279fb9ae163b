//! Integration tests for the NVC HTTP API.
//!
//! These drive the fully assembled router (middleware included) through
//! `tower::ServiceExt::oneshot`:
//! 1. Rules-only and AI-assisted conversation turns
//! 2. Fallback when the AI provider fails or misbehaves
//! 3. Completion, summary and resource endpoints
//! 4. Input limits and response headers

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use nvc_facilitator::adapters::ai::{FailoverAIProvider, MockAIProvider, MockError};
use nvc_facilitator::adapters::{build_router, NvcAppState};
use nvc_facilitator::application::ProcessMessageSettings;
use nvc_facilitator::config::{AppConfig, ServerConfig};
use nvc_facilitator::domain::nvc::{CompletionGate, FALLBACK_NEED};
use nvc_facilitator::ports::{AIProvider, MessageRole};

// =============================================================================
// Test Infrastructure
// =============================================================================

const NVC_CYCLE: [&str; 4] = [
    "I noticed he interrupted me three times in the meeting",
    "I feel frustrated and unheard",
    "I need respect and to be valued",
    "Would you be willing to let me finish my point?",
];

fn app_with(provider: Option<Arc<dyn AIProvider>>) -> Router {
    let state = NvcAppState::from_config(&AppConfig::default(), provider);
    build_router(state, &ServerConfig::default())
}

fn rules_app() -> Router {
    app_with(None)
}

fn ai_app(provider: &MockAIProvider) -> Router {
    app_with(Some(Arc::new(provider.clone())))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn turn(app: Router, message: &str, history: &[&str]) -> Value {
    let (status, json) = send(
        app,
        post(
            "/api/v1/nvc/conversation",
            json!({ "message": message, "conversationHistory": history }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json
}

// =============================================================================
// Rules-only conversation
// =============================================================================

#[tokio::test]
async fn rules_only_turn_advances_stage() {
    let json = turn(rules_app(), "I feel really anxious", &[]).await;

    assert_eq!(json["detectedStage"], "feeling");
    assert_eq!(json["currentStage"], "need");
    assert_eq!(json["source"], "rules");
    assert_eq!(json["complete"], false);
    assert!(json["summary"].is_null());
    assert!(!json["responseText"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn empty_message_starts_with_observation_guidance() {
    let (status, json) = send(rules_app(), post("/api/v1/nvc/conversation", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["detectedStage"], "starting");
    assert_eq!(json["currentStage"], "observation");
}

#[tokio::test]
async fn request_stage_is_sticky() {
    let json = turn(
        rules_app(),
        "Would you be willing to call me tonight?",
        &["I noticed the lights were on", "What did you feel?"],
    )
    .await;

    assert_eq!(json["detectedStage"], "request");
    assert_eq!(json["currentStage"], "request");
    assert_eq!(json["complete"], false);
}

// =============================================================================
// AI-assisted conversation
// =============================================================================

#[tokio::test]
async fn ai_turn_supplies_stage_and_reply() {
    let provider = MockAIProvider::new()
        .with_turn("need", "It sounds like respect really matters to you.");

    let json = turn(ai_app(&provider), "It matters that I'm heard", &[]).await;

    assert_eq!(json["detectedStage"], "need");
    assert_eq!(json["currentStage"], "request");
    assert_eq!(json["source"], "ai");
    assert_eq!(
        json["responseText"],
        "It sounds like respect really matters to you."
    );

    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    let last = calls[0].messages.last().unwrap();
    assert_eq!(last.role, MessageRole::User);
    assert_eq!(last.content, "It matters that I'm heard");
}

#[tokio::test]
async fn malformed_ai_output_falls_back_to_rules() {
    let provider = MockAIProvider::new().with_response("I think this is a feeling");

    let json = turn(ai_app(&provider), "I feel hopeful", &[]).await;

    assert_eq!(json["detectedStage"], "feeling");
    assert_eq!(json["source"], "rules");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn provider_error_falls_back_to_rules() {
    let provider = MockAIProvider::new().with_error(MockError::Unavailable {
        message: "overloaded".to_string(),
    });

    let json = turn(ai_app(&provider), "I feel hopeful", &[]).await;

    assert_eq!(json["detectedStage"], "feeling");
    assert_eq!(json["source"], "rules");
}

#[tokio::test]
async fn slow_provider_times_out_to_rules() {
    let provider = MockAIProvider::new()
        .with_turn("need", "too late")
        .with_delay(Duration::from_millis(200));
    let settings = ProcessMessageSettings {
        ai_timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let state = NvcAppState::new(
        CompletionGate::default(),
        Some(Arc::new(provider.clone())),
        settings,
    );
    let app = build_router(state, &ServerConfig::default());

    let json = turn(app, "I feel tired", &[]).await;

    assert_eq!(json["source"], "rules");
    assert_eq!(json["detectedStage"], "feeling");
}

#[tokio::test]
async fn stalled_provider_gets_rules_reply_before_request_timeout() {
    let provider = MockAIProvider::new()
        .with_turn("need", "too late")
        .with_delay(Duration::from_millis(600));
    let settings = ProcessMessageSettings {
        ai_timeout: Duration::from_millis(200),
        ..Default::default()
    };
    let server = ServerConfig {
        request_timeout_secs: 1,
        ..Default::default()
    };
    let state = NvcAppState::new(CompletionGate::default(), Some(Arc::new(provider)), settings);

    let json = turn(build_router(state, &server), "I feel tired", &[]).await;

    assert_eq!(json["source"], "rules");
    assert_eq!(json["detectedStage"], "feeling");
}

#[tokio::test]
async fn slow_primary_fails_over_inside_turn_timeout() {
    let primary = MockAIProvider::new()
        .with_turn("feeling", "from the stalled primary")
        .with_delay(Duration::from_millis(500));
    let fallback = MockAIProvider::new().with_turn("need", "Respect sounds important to you.");
    let chain = FailoverAIProvider::new(Arc::new(primary))
        .with_fallback(Arc::new(fallback.clone()))
        .with_primary_budget(Duration::from_millis(50));
    let settings = ProcessMessageSettings {
        ai_timeout: Duration::from_millis(300),
        ..Default::default()
    };
    let state = NvcAppState::new(CompletionGate::default(), Some(Arc::new(chain)), settings);

    let json = turn(
        build_router(state, &ServerConfig::default()),
        "It matters that I'm heard",
        &[],
    )
    .await;

    assert_eq!(json["source"], "ai");
    assert_eq!(json["detectedStage"], "need");
    assert_eq!(json["responseText"], "Respect sounds important to you.");
    assert_eq!(fallback.call_count(), 1);
}

// =============================================================================
// Completion and summaries
// =============================================================================

#[tokio::test]
async fn full_nvc_cycle_completes_after_enough_turns() {
    let history: Vec<&str> = NVC_CYCLE.iter().cycle().take(9).copied().collect();

    let json = turn(rules_app(), NVC_CYCLE[3], &history).await;

    assert_eq!(json["complete"], true);
    assert_eq!(json["currentStage"], "complete");
    let summary = json["summary"].as_str().unwrap();
    assert!(summary.contains(NVC_CYCLE[0]));
    assert!(json["responseText"].as_str().unwrap().contains(summary));
}

#[tokio::test]
async fn explicit_completion_phrase_completes_immediately() {
    let provider = MockAIProvider::new().with_turn("feeling", "unused");

    let json = turn(ai_app(&provider), "I'm done, show me the summary", &[]).await;

    assert_eq!(json["complete"], true);
    assert_eq!(json["source"], "rules");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn summary_endpoint_uses_fallbacks_for_missing_stages() {
    let (status, json) = send(
        rules_app(),
        post(
            "/api/v1/nvc/conversation/summary",
            json!({ "conversationHistory": [NVC_CYCLE[0], "How did that feel?", NVC_CYCLE[1]] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sections"]["need"], FALLBACK_NEED);
    assert!(json["summary"].as_str().unwrap().contains(FALLBACK_NEED));
}

// =============================================================================
// Resources, limits and system endpoints
// =============================================================================

#[tokio::test]
async fn resource_endpoints_list_vocabulary_and_examples() {
    let (_, feelings) = send(rules_app(), get("/api/v1/nvc/feelings")).await;
    let (_, needs) = send(rules_app(), get("/api/v1/nvc/needs")).await;
    let (_, examples) = send(rules_app(), get("/api/v1/nvc/examples")).await;

    assert!(feelings["feelings"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "frustrated"));
    assert!(needs["needs"].as_array().unwrap().iter().any(|n| n == "respect"));
    let first = &examples["examples"][0];
    for key in ["situation", "observation", "feeling", "need", "request"] {
        assert!(first[key].is_string(), "{key}");
    }
}

#[tokio::test]
async fn oversized_history_is_bad_request() {
    let mut config = AppConfig::default();
    config.conversation.max_history_len = 2;
    let app = build_router(NvcAppState::from_config(&config, None), &config.server);

    let (status, json) = send(
        app,
        post(
            "/api/v1/nvc/conversation",
            json!({ "message": "hi", "conversationHistory": ["a", "b", "c"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["details"]["actual"], 3);
}

#[tokio::test]
async fn oversized_summary_history_is_bad_request() {
    let mut config = AppConfig::default();
    config.conversation.max_history_len = 2;
    let app = build_router(NvcAppState::from_config(&config, None), &config.server);

    let (status, json) = send(
        app,
        post(
            "/api/v1/nvc/conversation/summary",
            json!({ "conversationHistory": ["a", "b", "c"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn health_and_root_report_version() {
    let (status, health) = send(rules_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["appName"], "NVC AI Facilitator");

    let (_, root) = send(rules_app(), get("/")).await;
    assert_eq!(root["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn api_responses_carry_security_headers() {
    let response = rules_app()
        .oneshot(get("/api/v1/nvc/needs"))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
    assert!(headers.contains_key("x-request-id"));
}
