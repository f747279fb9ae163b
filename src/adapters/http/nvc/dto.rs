//! HTTP DTOs for NVC endpoints
//!
//! Field names are camelCase on the wire to match the browser client.

use serde::{Deserialize, Serialize};

use crate::application::{ProcessMessageResult, ReplySource, SummarizeConversationResult};
use crate::domain::nvc::{NvcStage, NvcSummary, PracticeExample};

pub use crate::adapters::http::error::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// One conversation turn. The client owns the history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<String>,
}

/// Request for a summary of an existing history
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[serde(default)]
    pub conversation_history: Vec<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a conversation turn
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub response_text: String,
    pub current_stage: NvcStage,
    pub detected_stage: NvcStage,
    pub suggested_responses: Vec<String>,
    pub vocabulary_options: Vec<String>,
    /// Rendered summary, only once the conversation completes
    pub summary: Option<String>,
    pub complete: bool,
    pub source: ReplySource,
}

impl From<ProcessMessageResult> for ConversationResponse {
    fn from(result: ProcessMessageResult) -> Self {
        Self {
            response_text: result.response_text,
            current_stage: result.current_stage,
            detected_stage: result.detected_stage,
            suggested_responses: result.suggested_responses,
            vocabulary_options: result.vocabulary_options,
            summary: result.summary.map(|s| s.render()),
            complete: result.complete,
            source: result.source,
        }
    }
}

/// The four NVC components of a summary
#[derive(Debug, Clone, Serialize)]
pub struct SummarySections {
    pub observation: String,
    pub feeling: String,
    pub need: String,
    pub request: String,
}

impl From<NvcSummary> for SummarySections {
    fn from(summary: NvcSummary) -> Self {
        Self {
            observation: summary.observation,
            feeling: summary.feeling,
            need: summary.need,
            request: summary.request,
        }
    }
}

/// Response for the summary endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub sections: SummarySections,
}

impl From<SummarizeConversationResult> for SummaryResponse {
    fn from(result: SummarizeConversationResult) -> Self {
        Self {
            summary: result.text(),
            sections: result.summary.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeelingsResponse {
    pub feelings: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NeedsResponse {
    pub needs: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamplesResponse {
    pub examples: &'static [PracticeExample],
}
