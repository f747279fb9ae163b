//! NVC stages and the forward sequencer.
//!
//! A stage is either one of the four NVC components (observation, feeling,
//! need, request) or one of the meta-states `Starting` and `Complete`.
//! Stages are recomputed on every turn; nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Where a conversation is within the NVC process.
///
/// The four components are declared in canonical order. That order is also
/// the tie-break order used by the keyword classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NvcStage {
    /// Nothing recognisable has been said yet.
    Starting,

    /// What happened, stated without evaluation.
    Observation,

    /// The emotion the observation stirred up.
    Feeling,

    /// The universal need behind the feeling.
    Need,

    /// A concrete, doable request.
    Request,

    /// All four components are evidenced; a summary has been produced.
    Complete,
}

impl NvcStage {
    /// The four NVC components in canonical order.
    pub const COMPONENTS: [NvcStage; 4] = [
        NvcStage::Observation,
        NvcStage::Feeling,
        NvcStage::Need,
        NvcStage::Request,
    ];

    /// Returns the stage the facilitator should guide toward after this one.
    ///
    /// `Request` is sticky: the conversation stays there until a concrete
    /// request is made and the completion gate fires. `Complete` maps back to
    /// `Request` since the sequencer never produces the terminal state itself.
    pub fn next(&self) -> Self {
        match self {
            Self::Starting => Self::Observation,
            Self::Observation => Self::Feeling,
            Self::Feeling => Self::Need,
            Self::Need => Self::Request,
            Self::Request | Self::Complete => Self::Request,
        }
    }

    /// Wire name of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Observation => "observation",
            Self::Feeling => "feeling",
            Self::Need => "need",
            Self::Request => "request",
            Self::Complete => "complete",
        }
    }

    /// What the facilitator is trying to draw out in this stage.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Starting => "Welcome the person and invite them to describe the situation.",
            Self::Observation => {
                "Help them describe what happened as a camera would record it, free of judgment."
            }
            Self::Feeling => "Help them name the emotion they felt, not a thought about the other person.",
            Self::Need => "Help them connect the feeling to a universal human need.",
            Self::Request => {
                "Help them phrase a concrete, positive, doable request, e.g. 'Would you be willing...'."
            }
            Self::Complete => "Reflect the finished NVC statement back to them.",
        }
    }

    /// Returns true for the four NVC components.
    pub fn is_component(&self) -> bool {
        !matches!(self, Self::Starting | Self::Complete)
    }

    /// Returns true for the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for NvcStage {
    fn default() -> Self {
        Self::Starting
    }
}

impl fmt::Display for NvcStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage label that doesn't name any known stage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage label: '{0}'")]
pub struct UnknownStage(pub String);

impl FromStr for NvcStage {
    type Err = UnknownStage;

    /// Parses a stage label leniently: case-insensitive, surrounding
    /// punctuation ignored, plural forms accepted. `none` maps to `Starting`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        match label.as_str() {
            "starting" | "start" | "none" => Ok(Self::Starting),
            "observation" | "observations" => Ok(Self::Observation),
            "feeling" | "feelings" => Ok(Self::Feeling),
            "need" | "needs" => Ok(Self::Need),
            "request" | "requests" => Ok(Self::Request),
            "complete" | "completed" => Ok(Self::Complete),
            _ => Err(UnknownStage(s.to_string())),
        }
    }
}
