//! Keyword-based stage classifier.
//!
//! Scores a message against each component vocabulary and picks the stage
//! with the most keyword hits. This is the deterministic path that every
//! AI-assisted turn falls back to.

use std::sync::Arc;

use super::stage::NvcStage;
use super::vocabulary::{normalize, VocabularyTable};

/// Keyword hit counts for one message, in canonical stage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageScores {
    scores: Vec<(NvcStage, usize)>,
}

impl StageScores {
    /// Hit count for a stage (zero for meta-states).
    pub fn score(&self, stage: NvcStage) -> usize {
        self.scores
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// The stage with the strictly highest count; earlier stages win ties.
    /// Returns `Starting` when nothing matched.
    pub fn best(&self) -> NvcStage {
        let mut best = NvcStage::Starting;
        let mut best_score = 0;
        for (stage, score) in &self.scores {
            if *score > best_score {
                best = *stage;
                best_score = *score;
            }
        }
        best
    }

    /// Sum of all hits.
    pub fn total(&self) -> usize {
        self.scores.iter().map(|(_, n)| n).sum()
    }
}

/// Classifies free text into an NVC stage by substring keyword matching.
#[derive(Debug, Clone)]
pub struct StageClassifier {
    vocabulary: Arc<VocabularyTable>,
}

impl Default for StageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StageClassifier {
    /// Creates a classifier over the standard vocabulary.
    pub fn new() -> Self {
        Self::with_vocabulary(VocabularyTable::standard())
    }

    /// Creates a classifier over a custom vocabulary.
    pub fn with_vocabulary(vocabulary: Arc<VocabularyTable>) -> Self {
        Self { vocabulary }
    }

    /// Counts keyword hits per component stage.
    pub fn scores(&self, message: &str) -> StageScores {
        let text = normalize(message);
        let scores = self
            .vocabulary
            .iter()
            .map(|(stage, _)| (stage, self.vocabulary.count_matches(stage, &text)))
            .collect();
        StageScores { scores }
    }

    /// Infers which stage the message expresses.
    pub fn classify(&self, message: &str) -> NvcStage {
        self.scores(message).best()
    }
}
