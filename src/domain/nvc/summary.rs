//! Summary extraction.
//!
//! History alternates user and assistant turns, user first, so only the
//! even-indexed entries are the user's own words. Each user message is
//! filed under every stage whose vocabulary it mentions.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::stage::NvcStage;
use super::vocabulary::{normalize, VocabularyTable};

pub const FALLBACK_OBSERVATION: &str = "No specific observation was identified.";
pub const FALLBACK_FEELING: &str = "No specific feeling was identified.";
pub const FALLBACK_NEED: &str = "No specific need was identified.";
pub const FALLBACK_REQUEST: &str = "No specific request was identified.";

/// User messages grouped by the stage they evidence, in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub observations: Vec<String>,
    pub feelings: Vec<String>,
    pub needs: Vec<String>,
    pub requests: Vec<String>,
}

impl ExtractedContent {
    /// Messages filed under a component stage.
    pub fn for_stage(&self, stage: NvcStage) -> &[String] {
        match stage {
            NvcStage::Observation => &self.observations,
            NvcStage::Feeling => &self.feelings,
            NvcStage::Need => &self.needs,
            NvcStage::Request => &self.requests,
            NvcStage::Starting | NvcStage::Complete => &[],
        }
    }

    fn push(&mut self, stage: NvcStage, message: &str) {
        let bucket = match stage {
            NvcStage::Observation => &mut self.observations,
            NvcStage::Feeling => &mut self.feelings,
            NvcStage::Need => &mut self.needs,
            NvcStage::Request => &mut self.requests,
            NvcStage::Starting | NvcStage::Complete => return,
        };
        bucket.push(message.to_string());
    }

    /// Returns true if no message evidenced any stage.
    pub fn is_empty(&self) -> bool {
        NvcStage::COMPONENTS
            .iter()
            .all(|s| self.for_stage(*s).is_empty())
    }
}

/// The final structured NVC statement.
///
/// Every field is always populated: a stage without evidence carries its
/// fallback phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvcSummary {
    pub observation: String,
    pub feeling: String,
    pub need: String,
    pub request: String,
}

impl NvcSummary {
    /// Builds a summary from the first message per stage.
    pub fn from_extracted(content: &ExtractedContent) -> Self {
        let first_or = |stage: NvcStage, fallback: &str| {
            content
                .for_stage(stage)
                .first()
                .map(|m| m.trim().to_string())
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            observation: first_or(NvcStage::Observation, FALLBACK_OBSERVATION),
            feeling: first_or(NvcStage::Feeling, FALLBACK_FEELING),
            need: first_or(NvcStage::Need, FALLBACK_NEED),
            request: first_or(NvcStage::Request, FALLBACK_REQUEST),
        }
    }

    /// Field for a component stage.
    pub fn section(&self, stage: NvcStage) -> Option<&str> {
        match stage {
            NvcStage::Observation => Some(&self.observation),
            NvcStage::Feeling => Some(&self.feeling),
            NvcStage::Need => Some(&self.need),
            NvcStage::Request => Some(&self.request),
            NvcStage::Starting | NvcStage::Complete => None,
        }
    }

    /// Renders the summary as the text shown to the user.
    pub fn render(&self) -> String {
        format!(
            "Here is your NVC statement:\n\n\
             Observation: {}\n\
             Feeling: {}\n\
             Need: {}\n\
             Request: {}",
            self.observation, self.feeling, self.need, self.request
        )
    }
}

/// Pulls representative user messages per stage out of a history.
#[derive(Debug, Clone)]
pub struct SummaryExtractor {
    vocabulary: Arc<VocabularyTable>,
}

impl Default for SummaryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryExtractor {
    /// Creates an extractor over the standard vocabulary.
    pub fn new() -> Self {
        Self {
            vocabulary: VocabularyTable::standard(),
        }
    }

    /// Groups user turns by the stages they mention.
    pub fn extract<S: AsRef<str>>(&self, history: &[S]) -> ExtractedContent {
        let mut content = ExtractedContent::default();

        for message in history.iter().step_by(2) {
            let message = message.as_ref();
            let text = normalize(message);
            for (stage, _) in self.vocabulary.iter() {
                if self.vocabulary.mentions(stage, &text) {
                    content.push(stage, message);
                }
            }
        }

        content
    }

    /// Extracts and builds the structured summary in one step.
    pub fn summarize<S: AsRef<str>>(&self, history: &[S]) -> NvcSummary {
        NvcSummary::from_extracted(&self.extract(history))
    }
}
