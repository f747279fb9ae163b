//! Conversation configuration: completion thresholds and input limits

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::nvc::CompletionCriteria;

/// Conversation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Minimum history entries before the completion gate may fire
    #[serde(default = "default_min_turns")]
    pub min_turns_for_completion: usize,

    /// Distinct feeling words required for completion
    #[serde(default = "default_min_depth")]
    pub min_feeling_words: usize,

    /// Distinct need words required for completion
    #[serde(default = "default_min_depth")]
    pub min_need_words: usize,

    /// Maximum length of a single message (bytes)
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Maximum number of history entries accepted per request
    #[serde(default = "default_max_history_len")]
    pub max_history_len: usize,

    /// Number of most recent history entries sent to the AI provider
    #[serde(default = "default_ai_history_window")]
    pub ai_history_window: usize,
}

impl ConversationConfig {
    /// Thresholds for the completion gate
    pub fn criteria(&self) -> CompletionCriteria {
        CompletionCriteria {
            min_turns: self.min_turns_for_completion,
            min_feeling_words: self.min_feeling_words,
            min_need_words: self.min_need_words,
        }
    }

    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            (self.min_turns_for_completion, "min_turns_for_completion"),
            (self.min_feeling_words, "min_feeling_words"),
            (self.min_need_words, "min_need_words"),
            (self.max_message_length, "max_message_length"),
            (self.max_history_len, "max_history_len"),
        ];

        match checks.iter().find(|(value, _)| *value == 0) {
            Some((_, name)) => Err(ValidationError::ZeroThreshold(name)),
            None => Ok(()),
        }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            min_turns_for_completion: default_min_turns(),
            min_feeling_words: default_min_depth(),
            min_need_words: default_min_depth(),
            max_message_length: default_max_message_length(),
            max_history_len: default_max_history_len(),
            ai_history_window: default_ai_history_window(),
        }
    }
}

fn default_min_turns() -> usize {
    10
}

fn default_min_depth() -> usize {
    2
}

fn default_max_message_length() -> usize {
    4000
}

fn default_max_history_len() -> usize {
    200
}

fn default_ai_history_window() -> usize {
    10
}
