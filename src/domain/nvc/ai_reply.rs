//! Parsing and sanitizing LLM output for a conversation turn.
//!
//! The model is asked to answer with a JSON object naming the stage of the
//! user's latest message and a facilitator reply:
//!
//! ```json
//! {"stage": "feeling", "reply": "It sounds like that was painful..."}
//! ```
//!
//! Anything else (prose, unknown stage labels, empty replies) is rejected so
//! the caller can fall back to the keyword classifier.

use serde::Deserialize;
use thiserror::Error;

use super::stage::NvcStage;

/// Maximum accepted raw model output (bytes).
pub const MAX_AI_OUTPUT_LENGTH: usize = 20_000;

/// Maximum length of a reply passed on to the client (bytes).
pub const MAX_REPLY_LENGTH: usize = 2_000;

/// System prompt sent with every AI-assisted turn.
pub const FACILITATOR_SYSTEM_PROMPT: &str = "\
You are a warm, concise facilitator of Nonviolent Communication (NVC). \
You guide the user through four steps in order: observation, feeling, need, request. \
Classify the user's latest message into the NVC step it mainly expresses, \
then write a short reply (at most three sentences) that acknowledges it and \
helps them with the next step. \
Respond with JSON only, no other text: \
{\"stage\": \"observation\" | \"feeling\" | \"need\" | \"request\" | \"none\", \"reply\": \"...\"}";

/// Reasons an AI turn was discarded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AiReplyError {
    #[error("AI output too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("AI output is not valid JSON: {0}")]
    Parse(String),

    #[error("AI output has unknown stage label: {0}")]
    UnknownStage(String),

    #[error("AI output has an empty reply")]
    EmptyReply,
}

/// A validated AI turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiTurn {
    /// Stage of the user's latest message. Never `Complete`.
    pub stage: NvcStage,
    /// Sanitized facilitator reply.
    pub reply: String,
}

#[derive(Debug, Deserialize)]
struct RawAiTurn {
    stage: String,
    reply: String,
}

impl AiTurn {
    /// Validates raw model output into an `AiTurn`.
    ///
    /// # Steps
    /// 1. Validate length
    /// 2. Remove control characters and prompt-injection markers
    /// 3. Extract the JSON object (bare or inside a code block)
    /// 4. Check the stage label and reply
    pub fn parse(output: &str) -> Result<Self, AiReplyError> {
        if output.len() > MAX_AI_OUTPUT_LENGTH {
            return Err(AiReplyError::TooLong {
                max: MAX_AI_OUTPUT_LENGTH,
                actual: output.len(),
            });
        }

        let cleaned = strip_injection_markers(&remove_control_chars(output));
        let json = extract_json_object(&cleaned)
            .ok_or_else(|| AiReplyError::Parse("no JSON object found".to_string()))?;

        let raw: RawAiTurn =
            serde_json::from_str(json).map_err(|e| AiReplyError::Parse(e.to_string()))?;

        // The completion gate owns the terminal state.
        let stage = match raw.stage.parse::<NvcStage>() {
            Ok(NvcStage::Complete) | Err(_) => return Err(AiReplyError::UnknownStage(raw.stage)),
            Ok(stage) => stage,
        };

        let reply = raw.reply.trim();
        if reply.is_empty() {
            return Err(AiReplyError::EmptyReply);
        }

        Ok(Self {
            stage,
            reply: truncate(reply, MAX_REPLY_LENGTH),
        })
    }
}

fn remove_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
        .collect()
}

fn strip_injection_markers(s: &str) -> String {
    const PATTERNS: [&str; 10] = [
        "```system",
        "```assistant",
        "[INST]",
        "[/INST]",
        "<|system|>",
        "<|assistant|>",
        "<|user|>",
        "<|im_start|>",
        "<|im_end|>",
        "<<SYS>>",
    ];

    PATTERNS
        .iter()
        .fold(s.to_string(), |acc, pattern| acc.replace(pattern, ""))
}

/// Finds the first balanced `{...}` in the text, skipping braces in strings.
fn extract_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
