//! ProcessMessageHandler - Run one facilitator turn over a client-held history

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AiConfig, ConversationConfig};
use crate::domain::nvc::{
    AiTurn, CompletionGate, NvcStage, NvcSummary, StageClassifier, StageGuidance,
    SummaryExtractor, FACILITATOR_SYSTEM_PROMPT,
};
use crate::ports::{AIProvider, CompletionRequest, Message, RequestMetadata};

/// Command to process the user's latest message
#[derive(Debug, Clone, Default)]
pub struct ProcessMessageCommand {
    pub message: String,
    /// Prior turns, alternating user/assistant, user first
    pub history: Vec<String>,
}

/// Which path produced the detected stage and reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Ai,
    Rules,
}

/// Result of one conversation turn
#[derive(Debug, Clone)]
pub struct ProcessMessageResult {
    pub response_text: String,
    /// Stage the facilitator is now guiding toward
    pub current_stage: NvcStage,
    /// Stage the latest message was judged to express
    pub detected_stage: NvcStage,
    pub suggested_responses: Vec<String>,
    pub vocabulary_options: Vec<String>,
    /// Present only when the conversation completed on this turn
    pub summary: Option<NvcSummary>,
    pub complete: bool,
    pub source: ReplySource,
}

/// Error type for processing messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessMessageError {
    /// Message exceeds the configured length
    MessageTooLong { max: usize, actual: usize },
    /// History has more entries than allowed
    HistoryTooLong { max: usize, actual: usize },
}

impl std::fmt::Display for ProcessMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessMessageError::MessageTooLong { max, actual } => {
                write!(f, "Message is {} bytes; maximum is {}", actual, max)
            }
            ProcessMessageError::HistoryTooLong { max, actual } => {
                write!(f, "History has {} entries; maximum is {}", actual, max)
            }
        }
    }
}

impl std::error::Error for ProcessMessageError {}

/// Limits and AI call settings for the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessMessageSettings {
    pub ai_timeout: Duration,
    pub ai_history_window: usize,
    pub max_message_length: usize,
    pub max_history_len: usize,
}

impl ProcessMessageSettings {
    pub fn from_config(conversation: &ConversationConfig, ai: &AiConfig) -> Self {
        Self {
            ai_timeout: ai.timeout(),
            ai_history_window: conversation.ai_history_window,
            max_message_length: conversation.max_message_length,
            max_history_len: conversation.max_history_len,
        }
    }
}

impl Default for ProcessMessageSettings {
    fn default() -> Self {
        Self::from_config(&ConversationConfig::default(), &AiConfig::default())
    }
}

/// Handler for conversation turns
///
/// Stateless: everything it needs arrives in the command. The AI provider is
/// optional; without one, or whenever it fails, the keyword classifier and
/// rule-based replies are used.
#[derive(Clone)]
pub struct ProcessMessageHandler {
    classifier: StageClassifier,
    gate: CompletionGate,
    extractor: SummaryExtractor,
    ai_provider: Option<Arc<dyn AIProvider>>,
    settings: ProcessMessageSettings,
}

impl ProcessMessageHandler {
    pub fn new(
        gate: CompletionGate,
        ai_provider: Option<Arc<dyn AIProvider>>,
        settings: ProcessMessageSettings,
    ) -> Self {
        Self {
            classifier: StageClassifier::new(),
            gate,
            extractor: SummaryExtractor::new(),
            ai_provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessMessageCommand,
    ) -> Result<ProcessMessageResult, ProcessMessageError> {
        // 1. Enforce input limits
        self.check_limits(&cmd)?;

        let trace_id = uuid::Uuid::new_v4().to_string();
        let ProcessMessageCommand { message, history } = cmd;

        // 2. The completion gate sees the history including this message
        let mut full_history = history;
        full_history.push(message);

        if self.gate.should_complete(&full_history) {
            return Ok(self.complete(&full_history, &trace_id));
        }

        let (prior, latest) = full_history.split_at(full_history.len() - 1);
        let message = latest[0].as_str();

        // 3. Detect the stage: AI first (if configured), keywords otherwise
        let ai_turn = match &self.ai_provider {
            Some(provider) if !message.trim().is_empty() => {
                self.assist(provider.as_ref(), prior, message, &trace_id)
                    .await
            }
            _ => None,
        };

        let (detected_stage, ai_reply, source) = match ai_turn {
            Some(turn) => (turn.stage, Some(turn.reply), ReplySource::Ai),
            None => (self.classifier.classify(message), None, ReplySource::Rules),
        };

        // 4. Advance and build guidance for the next stage
        let current_stage = detected_stage.next();
        let guidance = StageGuidance::for_stage(current_stage);
        let response_text = ai_reply.unwrap_or_else(|| guidance.compose_reply(detected_stage));

        tracing::info!(
            trace_id = %trace_id,
            detected = %detected_stage,
            current = %current_stage,
            source = ?source,
            turns = full_history.len(),
            "Processed conversation turn"
        );

        Ok(ProcessMessageResult {
            response_text,
            current_stage,
            detected_stage,
            suggested_responses: guidance.suggested_responses,
            vocabulary_options: guidance.vocabulary_options,
            summary: None,
            complete: false,
            source,
        })
    }

    fn check_limits(&self, cmd: &ProcessMessageCommand) -> Result<(), ProcessMessageError> {
        let max = self.settings.max_message_length;
        if let Some(actual) = std::iter::once(&cmd.message)
            .chain(cmd.history.iter())
            .map(String::len)
            .find(|len| *len > max)
        {
            return Err(ProcessMessageError::MessageTooLong { max, actual });
        }

        if cmd.history.len() > self.settings.max_history_len {
            return Err(ProcessMessageError::HistoryTooLong {
                max: self.settings.max_history_len,
                actual: cmd.history.len(),
            });
        }

        Ok(())
    }

    fn complete(&self, history: &[String], trace_id: &str) -> ProcessMessageResult {
        let assessment = self.gate.evaluate(history);
        let summary = self.extractor.summarize(history);
        let guidance = StageGuidance::for_stage(NvcStage::Complete);
        let detected_stage = history
            .last()
            .map(|m| self.classifier.classify(m))
            .unwrap_or_default();

        tracing::info!(
            trace_id = %trace_id,
            explicit = assessment.explicit_request,
            turns = history.len(),
            distinct_feelings = assessment.distinct_feelings,
            distinct_needs = assessment.distinct_needs,
            "Conversation complete"
        );

        ProcessMessageResult {
            response_text: format!("{}\n\n{}", guidance.prompt, summary.render()),
            current_stage: NvcStage::Complete,
            detected_stage,
            suggested_responses: guidance.suggested_responses,
            vocabulary_options: guidance.vocabulary_options,
            summary: Some(summary),
            complete: true,
            source: ReplySource::Rules,
        }
    }

    /// Asks the AI provider for a stage label and reply.
    ///
    /// Returns `None` on timeout, provider error or unusable output.
    async fn assist(
        &self,
        provider: &dyn AIProvider,
        prior: &[String],
        message: &str,
        trace_id: &str,
    ) -> Option<AiTurn> {
        let request = self.build_request(prior, message, trace_id);

        let response =
            match tokio::time::timeout(self.settings.ai_timeout, provider.complete(request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => {
                    tracing::warn!(trace_id = %trace_id, error = %err, "AI provider failed; using keyword rules");
                    return None;
                }
                Err(_) => {
                    tracing::warn!(
                        trace_id = %trace_id,
                        timeout_secs = self.settings.ai_timeout.as_secs(),
                        "AI provider timed out; using keyword rules"
                    );
                    return None;
                }
            };

        match AiTurn::parse(&response.content) {
            Ok(turn) => Some(turn),
            Err(err) => {
                tracing::warn!(trace_id = %trace_id, error = %err, "Discarding AI output; using keyword rules");
                None
            }
        }
    }

    fn build_request(&self, prior: &[String], message: &str, trace_id: &str) -> CompletionRequest {
        // Keep whole exchanges: the window starts on a user turn.
        let mut start = prior.len().saturating_sub(self.settings.ai_history_window);
        if start % 2 == 1 {
            start += 1;
        }

        let window = prior.iter().enumerate().skip(start).map(|(i, content)| {
            if i % 2 == 0 {
                Message::user(content.as_str())
            } else {
                Message::assistant(content.as_str())
            }
        });

        CompletionRequest::new(RequestMetadata::new(trace_id))
            .with_system_prompt(system_prompt())
            .with_messages(window)
            .with_message(crate::ports::MessageRole::User, message)
            .with_max_tokens(400)
            .with_temperature(0.7)
    }
}

fn system_prompt() -> String {
    let steps = NvcStage::COMPONENTS
        .iter()
        .map(|stage| format!("- {}: {}", stage, stage.directive()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{FACILITATOR_SYSTEM_PROMPT}\n\nSteps:\n{steps}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::nvc::{CompletionCriteria, FALLBACK_OBSERVATION};
    use crate::ports::MessageRole;

    fn rules_only() -> ProcessMessageHandler {
        ProcessMessageHandler::new(
            CompletionGate::default(),
            None,
            ProcessMessageSettings::default(),
        )
    }

    fn with_ai(provider: &MockAIProvider) -> ProcessMessageHandler {
        ProcessMessageHandler::new(
            CompletionGate::default(),
            Some(Arc::new(provider.clone())),
            ProcessMessageSettings::default(),
        )
    }

    fn cmd(message: &str, history: &[&str]) -> ProcessMessageCommand {
        ProcessMessageCommand {
            message: message.to_string(),
            history: history.iter().map(|s| s.to_string()).collect(),
        }
    }

    mod rules_path {
        use super::*;

        #[tokio::test]
        async fn observation_moves_to_feeling() {
            let result = rules_only()
                .handle(cmd("I noticed he interrupted me", &[]))
                .await
                .unwrap();

            assert_eq!(result.detected_stage, NvcStage::Observation);
            assert_eq!(result.current_stage, NvcStage::Feeling);
            assert_eq!(result.source, ReplySource::Rules);
            assert!(!result.complete);
            assert!(result.summary.is_none());
            assert!(result.vocabulary_options.contains(&"frustrated".to_string()));
        }

        #[tokio::test]
        async fn empty_message_starts_at_observation() {
            let result = rules_only().handle(cmd("", &[])).await.unwrap();

            assert_eq!(result.detected_stage, NvcStage::Starting);
            assert_eq!(result.current_stage, NvcStage::Observation);
            assert_eq!(
                result.response_text,
                StageGuidance::for_stage(NvcStage::Observation).prompt
            );
        }

        #[tokio::test]
        async fn request_stage_is_sticky() {
            let result = rules_only()
                .handle(cmd("Please stop", &[]))
                .await
                .unwrap();

            assert_eq!(result.detected_stage, NvcStage::Request);
            assert_eq!(result.current_stage, NvcStage::Request);
        }
    }

    mod completion {
        use super::*;

        #[tokio::test]
        async fn explicit_request_completes_with_summary() {
            let history = ["I noticed he interrupted me", "How did you feel?"];
            let result = rules_only()
                .handle(cmd("I'm done", &history))
                .await
                .unwrap();

            assert!(result.complete);
            assert_eq!(result.current_stage, NvcStage::Complete);
            let summary = result.summary.unwrap();
            assert_eq!(summary.observation, "I noticed he interrupted me");
            assert!(result.response_text.contains("Observation: I noticed he interrupted me"));
        }

        #[tokio::test]
        async fn gate_counts_the_new_message() {
            let handler = ProcessMessageHandler::new(
                CompletionGate::new(CompletionCriteria {
                    min_turns: 4,
                    ..Default::default()
                }),
                None,
                ProcessMessageSettings::default(),
            );
            let history = [
                "I noticed he interrupted me",
                "I feel frustrated and unheard",
                "I need respect and value",
            ];

            let result = handler
                .handle(cmd("Would you be willing to let me finish?", &history))
                .await
                .unwrap();

            assert!(result.complete);
        }

        #[tokio::test]
        async fn completion_skips_ai() {
            let provider = MockAIProvider::new().with_turn("feeling", "unused");
            let result = with_ai(&provider)
                .handle(cmd("show me the summary", &[]))
                .await
                .unwrap();

            assert!(result.complete);
            assert_eq!(provider.call_count(), 0);
            assert_eq!(result.summary.unwrap().observation, FALLBACK_OBSERVATION);
        }
    }

    mod ai_path {
        use super::*;

        #[tokio::test]
        async fn valid_ai_turn_is_used() {
            let provider =
                MockAIProvider::new().with_turn("feeling", "It sounds like that hurt.");
            let result = with_ai(&provider)
                .handle(cmd("it stung when he said that", &[]))
                .await
                .unwrap();

            assert_eq!(result.source, ReplySource::Ai);
            assert_eq!(result.detected_stage, NvcStage::Feeling);
            assert_eq!(result.current_stage, NvcStage::Need);
            assert_eq!(result.response_text, "It sounds like that hurt.");
            assert!(result.vocabulary_options.contains(&"respect".to_string()));
        }

        #[tokio::test]
        async fn malformed_output_falls_back_to_rules() {
            let provider = MockAIProvider::new().with_response("The user feels sad.");
            let result = with_ai(&provider)
                .handle(cmd("I noticed he interrupted me", &[]))
                .await
                .unwrap();

            assert_eq!(result.source, ReplySource::Rules);
            assert_eq!(result.detected_stage, NvcStage::Observation);
            assert_eq!(provider.call_count(), 1);
        }

        #[tokio::test]
        async fn provider_error_falls_back_to_rules() {
            let provider = MockAIProvider::new().with_error(MockError::Unavailable {
                message: "down".to_string(),
            });
            let result = with_ai(&provider)
                .handle(cmd("I feel anxious", &[]))
                .await
                .unwrap();

            assert_eq!(result.source, ReplySource::Rules);
            assert_eq!(result.detected_stage, NvcStage::Feeling);
        }

        #[tokio::test]
        async fn slow_provider_times_out() {
            let provider = MockAIProvider::new()
                .with_turn("need", "too late")
                .with_delay(Duration::from_millis(200));
            let handler = ProcessMessageHandler::new(
                CompletionGate::default(),
                Some(Arc::new(provider)),
                ProcessMessageSettings {
                    ai_timeout: Duration::from_millis(20),
                    ..Default::default()
                },
            );

            let result = handler.handle(cmd("I need rest", &[])).await.unwrap();

            assert_eq!(result.source, ReplySource::Rules);
            assert_eq!(result.detected_stage, NvcStage::Need);
        }

        #[tokio::test]
        async fn empty_message_does_not_call_ai() {
            let provider = MockAIProvider::new();
            let result = with_ai(&provider).handle(cmd("  ", &[])).await.unwrap();

            assert_eq!(provider.call_count(), 0);
            assert_eq!(result.detected_stage, NvcStage::Starting);
        }

        #[tokio::test]
        async fn request_carries_windowed_history_with_roles() {
            let provider = MockAIProvider::new().with_turn("need", "ok");
            let handler = ProcessMessageHandler::new(
                CompletionGate::default(),
                Some(Arc::new(provider.clone())),
                ProcessMessageSettings {
                    ai_history_window: 3,
                    ..Default::default()
                },
            );
            let history = ["u0", "a1", "u2", "a3", "u4"];

            handler.handle(cmd("latest", &history)).await.unwrap();

            let calls = provider.get_calls();
            let request = &calls[0];
            let contents: Vec<&str> = request.messages.iter().map(|m| m.content.as_str()).collect();
            // window of 3 starts at index 2, an even (user) index
            assert_eq!(contents, vec!["u2", "a3", "u4", "latest"]);
            assert_eq!(request.messages[0].role, MessageRole::User);
            assert_eq!(request.messages[1].role, MessageRole::Assistant);
            assert!(request
                .system_prompt
                .as_deref()
                .is_some_and(|p| p.contains("observation")));
        }
    }

    mod limits {
        use super::*;

        #[tokio::test]
        async fn long_message_is_rejected() {
            let handler = ProcessMessageHandler::new(
                CompletionGate::default(),
                None,
                ProcessMessageSettings {
                    max_message_length: 5,
                    ..Default::default()
                },
            );

            let err = handler.handle(cmd("too long", &[])).await.unwrap_err();
            assert_eq!(err, ProcessMessageError::MessageTooLong { max: 5, actual: 8 });
        }

        #[tokio::test]
        async fn long_history_is_rejected() {
            let handler = ProcessMessageHandler::new(
                CompletionGate::default(),
                None,
                ProcessMessageSettings {
                    max_history_len: 1,
                    ..Default::default()
                },
            );

            let err = handler.handle(cmd("hi", &["a", "b"])).await.unwrap_err();
            assert_eq!(err, ProcessMessageError::HistoryTooLong { max: 1, actual: 2 });
        }
    }
}
