//! Nonviolent Communication facilitation.
//!
//! Pure, synchronous building blocks for one conversation turn:
//!
//! - `stage` - The NVC stages and the forward sequencer
//! - `vocabulary` - Static keyword tables shared by every component
//! - `classifier` - Keyword-based stage detection
//! - `completion` - Decides when all four components are covered
//! - `summary` - Extracts the final NVC statement from a history
//! - `guidance` - Rule-based facilitator replies and suggestions
//! - `ai_reply` - Validation of LLM output for the AI-assisted path
//! - `practice` - Worked examples for practice

mod ai_reply;
mod classifier;
mod completion;
mod guidance;
mod practice;
mod stage;
mod summary;
pub mod vocabulary;

pub use ai_reply::{AiReplyError, AiTurn, FACILITATOR_SYSTEM_PROMPT, MAX_REPLY_LENGTH};
pub use classifier::{StageClassifier, StageScores};
pub use completion::{CompletionAssessment, CompletionCriteria, CompletionGate};
pub use guidance::StageGuidance;
pub use practice::{PracticeExample, PRACTICE_EXAMPLES};
pub use stage::{NvcStage, UnknownStage};
pub use summary::{
    ExtractedContent, NvcSummary, SummaryExtractor, FALLBACK_FEELING, FALLBACK_NEED,
    FALLBACK_OBSERVATION, FALLBACK_REQUEST,
};
pub use vocabulary::VocabularyTable;
