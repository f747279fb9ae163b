//! HTTP handlers for NVC endpoints
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{
    ProcessMessageCommand, ProcessMessageError, ProcessMessageHandler, ProcessMessageSettings,
    SummarizeConversationError, SummarizeConversationHandler, SummarizeConversationQuery,
};
use crate::config::AppConfig;
use crate::domain::nvc::{CompletionGate, VocabularyTable, PRACTICE_EXAMPLES};
use crate::ports::AIProvider;

use super::dto::{
    ConversationRequest, ConversationResponse, ErrorResponse, ExamplesResponse, FeelingsResponse,
    NeedsResponse, SummaryRequest, SummaryResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct NvcAppState {
    pub gate: CompletionGate,
    pub ai_provider: Option<Arc<dyn AIProvider>>,
    pub settings: ProcessMessageSettings,
    pub vocabulary: Arc<VocabularyTable>,
}

impl NvcAppState {
    pub fn new(
        gate: CompletionGate,
        ai_provider: Option<Arc<dyn AIProvider>>,
        settings: ProcessMessageSettings,
    ) -> Self {
        Self {
            gate,
            ai_provider,
            settings,
            vocabulary: VocabularyTable::standard(),
        }
    }

    /// Builds state from loaded configuration and an optional provider chain.
    pub fn from_config(config: &AppConfig, ai_provider: Option<Arc<dyn AIProvider>>) -> Self {
        Self::new(
            CompletionGate::new(config.conversation.criteria()),
            ai_provider,
            ProcessMessageSettings::from_config(&config.conversation, &config.ai),
        )
    }

    pub fn process_message_handler(&self) -> ProcessMessageHandler {
        ProcessMessageHandler::new(self.gate.clone(), self.ai_provider.clone(), self.settings)
    }

    pub fn summarize_handler(&self) -> SummarizeConversationHandler {
        SummarizeConversationHandler::new(self.settings.max_history_len)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Run one facilitator turn
///
/// POST /api/v1/nvc/conversation
pub async fn process_conversation(
    State(app_state): State<NvcAppState>,
    Json(req): Json<ConversationRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let cmd = ProcessMessageCommand {
        message: req.message,
        history: req.conversation_history,
    };

    let handler = app_state.process_message_handler();
    let result = handler.handle(cmd).await.map_err(|e| {
        let details = match &e {
            ProcessMessageError::MessageTooLong { max, actual }
            | ProcessMessageError::HistoryTooLong { max, actual } => {
                serde_json::json!({ "max": max, "actual": actual })
            }
        };
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string()).with_details(details)),
        )
    })?;

    Ok((StatusCode::OK, Json(ConversationResponse::from(result))))
}

/// Summarize a conversation without advancing it
///
/// POST /api/v1/nvc/conversation/summary
pub async fn summarize_conversation(
    State(app_state): State<NvcAppState>,
    Json(req): Json<SummaryRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let query = SummarizeConversationQuery {
        history: req.conversation_history,
    };

    let result = app_state.summarize_handler().handle(query).map_err(|e| match e {
        SummarizeConversationError::HistoryTooLong { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        ),
    })?;

    Ok((StatusCode::OK, Json(SummaryResponse::from(result))))
}

/// Feelings vocabulary
///
/// GET /api/v1/nvc/feelings
pub async fn list_feelings(State(app_state): State<NvcAppState>) -> impl IntoResponse {
    Json(FeelingsResponse {
        feelings: app_state.vocabulary.feeling_words().to_vec(),
    })
}

/// Universal needs
///
/// GET /api/v1/nvc/needs
pub async fn list_needs(State(app_state): State<NvcAppState>) -> impl IntoResponse {
    Json(NeedsResponse {
        needs: app_state.vocabulary.need_words().to_vec(),
    })
}

/// Practice examples
///
/// GET /api/v1/nvc/examples
pub async fn list_examples() -> impl IntoResponse {
    Json(ExamplesResponse {
        examples: PRACTICE_EXAMPLES,
    })
}
