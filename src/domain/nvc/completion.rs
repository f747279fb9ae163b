//! Completion gate.
//!
//! Decides from the accumulated history whether all four NVC components have
//! been evidenced deeply enough to stop asking questions and emit a summary.
//! The heuristic is deliberately conservative: a single message containing
//! one keyword from each vocabulary never completes on its own.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::stage::NvcStage;
use super::vocabulary::{
    contains_any, matching_words, normalize, VocabularyTable, COMPLETION_PHRASES,
    SPECIFIC_REQUEST_PHRASES,
};

/// Tunable thresholds for the completion gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCriteria {
    /// Minimum number of history entries before completion is considered.
    pub min_turns: usize,
    /// Minimum number of distinct feeling words across the history.
    pub min_feeling_words: usize,
    /// Minimum number of distinct need words across the history.
    pub min_need_words: usize,
}

impl Default for CompletionCriteria {
    fn default() -> Self {
        Self {
            min_turns: 10,
            min_feeling_words: 2,
            min_need_words: 2,
        }
    }
}

/// Everything the gate looked at, for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionAssessment {
    /// The latest message asked to finish.
    pub explicit_request: bool,
    /// History met the minimum length.
    pub enough_turns: bool,
    pub has_observation: bool,
    pub has_feeling: bool,
    pub has_need: bool,
    /// An actionable request phrase appeared.
    pub has_specific_request: bool,
    pub distinct_feelings: usize,
    pub distinct_needs: usize,
    /// Both depth thresholds were met.
    pub depth_satisfied: bool,
}

impl CompletionAssessment {
    /// Applies the completion policy.
    pub fn is_complete(&self) -> bool {
        if self.explicit_request {
            return true;
        }
        self.enough_turns
            && self.has_observation
            && self.has_feeling
            && self.has_need
            && self.has_specific_request
            && self.depth_satisfied
    }
}

/// Decides when a conversation has covered all four components.
#[derive(Debug, Clone)]
pub struct CompletionGate {
    criteria: CompletionCriteria,
    vocabulary: Arc<VocabularyTable>,
}

impl Default for CompletionGate {
    fn default() -> Self {
        Self::new(CompletionCriteria::default())
    }
}

impl CompletionGate {
    /// Creates a gate over the standard vocabulary.
    pub fn new(criteria: CompletionCriteria) -> Self {
        Self {
            criteria,
            vocabulary: VocabularyTable::standard(),
        }
    }

    /// Returns the configured thresholds.
    pub fn criteria(&self) -> CompletionCriteria {
        self.criteria
    }

    /// Returns true if the latest message contains a completion phrase.
    pub fn is_explicit_completion(&self, message: &str) -> bool {
        contains_any(COMPLETION_PHRASES, &normalize(message))
    }

    /// Returns true if the conversation should end and be summarised.
    pub fn should_complete<S: AsRef<str>>(&self, history: &[S]) -> bool {
        self.evaluate(history).is_complete()
    }

    /// Scores the history against every completion condition.
    pub fn evaluate<S: AsRef<str>>(&self, history: &[S]) -> CompletionAssessment {
        let explicit_request = history
            .last()
            .is_some_and(|last| self.is_explicit_completion(last.as_ref()));

        let text = normalize(
            &history
                .iter()
                .map(|m| m.as_ref())
                .collect::<Vec<_>>()
                .join(" "),
        );

        let distinct_feelings = matching_words(self.vocabulary.feeling_words(), &text).len();
        let distinct_needs = matching_words(self.vocabulary.need_words(), &text).len();

        CompletionAssessment {
            explicit_request,
            enough_turns: history.len() >= self.criteria.min_turns,
            has_observation: self.vocabulary.mentions(NvcStage::Observation, &text),
            has_feeling: self.vocabulary.mentions(NvcStage::Feeling, &text),
            has_need: self.vocabulary.mentions(NvcStage::Need, &text),
            has_specific_request: contains_any(SPECIFIC_REQUEST_PHRASES, &text),
            distinct_feelings,
            distinct_needs,
            depth_satisfied: distinct_feelings >= self.criteria.min_feeling_words
                && distinct_needs >= self.criteria.min_need_words,
        }
    }
}
