//! SummarizeConversationHandler - Build the NVC statement on demand

use crate::domain::nvc::{ExtractedContent, NvcSummary, SummaryExtractor};

/// Query for a summary of a client-held history
#[derive(Debug, Clone, Default)]
pub struct SummarizeConversationQuery {
    pub history: Vec<String>,
}

/// Result of summarizing
#[derive(Debug, Clone)]
pub struct SummarizeConversationResult {
    pub summary: NvcSummary,
    pub extracted: ExtractedContent,
}

impl SummarizeConversationResult {
    /// The summary as display text.
    pub fn text(&self) -> String {
        self.summary.render()
    }
}

/// Error type for summarizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeConversationError {
    /// History has more entries than allowed
    HistoryTooLong { max: usize, actual: usize },
}

impl std::fmt::Display for SummarizeConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizeConversationError::HistoryTooLong { max, actual } => {
                write!(f, "History has {} entries; maximum is {}", actual, max)
            }
        }
    }
}

impl std::error::Error for SummarizeConversationError {}

/// Handler for summary queries
#[derive(Debug, Clone)]
pub struct SummarizeConversationHandler {
    extractor: SummaryExtractor,
    max_history_len: usize,
}

impl SummarizeConversationHandler {
    pub fn new(max_history_len: usize) -> Self {
        Self {
            extractor: SummaryExtractor::new(),
            max_history_len,
        }
    }

    pub fn handle(
        &self,
        query: SummarizeConversationQuery,
    ) -> Result<SummarizeConversationResult, SummarizeConversationError> {
        if query.history.len() > self.max_history_len {
            return Err(SummarizeConversationError::HistoryTooLong {
                max: self.max_history_len,
                actual: query.history.len(),
            });
        }

        let extracted = self.extractor.extract(&query.history);
        let summary = NvcSummary::from_extracted(&extracted);

        tracing::debug!(
            turns = query.history.len(),
            observations = extracted.observations.len(),
            feelings = extracted.feelings.len(),
            needs = extracted.needs.len(),
            requests = extracted.requests.len(),
            "Summarized conversation"
        );

        Ok(SummarizeConversationResult { summary, extracted })
    }
}
