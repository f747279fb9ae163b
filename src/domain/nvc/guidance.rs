//! Facilitator replies for the rule-based path.
//!
//! Each stage has a prompt, a few sentence starters the client can offer as
//! quick replies, and an optional vocabulary list (feelings for the feeling
//! stage, needs for the need stage).

use super::stage::NvcStage;
use super::vocabulary::{
    feeling_words, NEED_WORDS, OBSERVATION_STARTERS, SPECIFIC_REQUEST_PHRASES,
};

/// What the facilitator says and offers while guiding toward a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageGuidance {
    pub stage: NvcStage,
    pub prompt: &'static str,
    pub suggested_responses: Vec<String>,
    pub vocabulary_options: Vec<String>,
}

impl StageGuidance {
    /// Guidance for the stage the conversation is moving toward.
    pub fn for_stage(stage: NvcStage) -> Self {
        let (prompt, suggestions, vocabulary): (&'static str, Vec<&str>, Vec<&str>) = match stage {
            NvcStage::Starting => (
                "Welcome. Let's work through what's on your mind together. \
                 What happened?",
                vec!["Something happened at work", "I had a conflict with someone close to me"],
                Vec::new(),
            ),
            NvcStage::Observation => (
                "Let's start with what happened. What did you see or hear, \
                 described the way a camera would record it, without judgment?",
                vec!["When I saw...", "I noticed that...", "Yesterday, when you..."],
                OBSERVATION_STARTERS.to_vec(),
            ),
            NvcStage::Feeling => (
                "How did you feel when that happened? Try to name the emotion \
                 itself rather than what you think the other person did.",
                vec!["I feel...", "I felt... when that happened", "I'm feeling..."],
                feeling_words().collect(),
            ),
            NvcStage::Need => (
                "What need of yours is behind that feeling? What matters to you here?",
                vec!["I need...", "It's important to me that...", "I value..."],
                NEED_WORDS.to_vec(),
            ),
            NvcStage::Request => (
                "What concrete, doable request could you make to meet that need? \
                 Ask for a specific action the other person can say yes or no to.",
                vec![
                    "Would you be willing to...",
                    "Could you please...",
                    "I would like you to...",
                ],
                SPECIFIC_REQUEST_PHRASES.to_vec(),
            ),
            NvcStage::Complete => (
                "Thank you for working through this. Here is the NVC statement \
                 we put together.",
                vec!["Start a new conversation", "Practice another situation"],
                Vec::new(),
            ),
        };

        Self {
            stage,
            prompt,
            suggested_responses: suggestions.into_iter().map(str::to_string).collect(),
            vocabulary_options: vocabulary.into_iter().map(str::to_string).collect(),
        }
    }

    /// Reply text: a short acknowledgement of what was heard, then the prompt.
    pub fn compose_reply(&self, detected: NvcStage) -> String {
        match acknowledgement(detected) {
            Some(ack) => format!("{ack} {}", self.prompt),
            None => self.prompt.to_string(),
        }
    }
}

fn acknowledgement(detected: NvcStage) -> Option<&'static str> {
    match detected {
        NvcStage::Observation => Some("Thank you for describing what happened."),
        NvcStage::Feeling => Some("It sounds like you're in touch with how you feel."),
        NvcStage::Need => Some("That need sounds important."),
        NvcStage::Request => Some("That's a step toward a clear request."),
        NvcStage::Starting | NvcStage::Complete => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nvc::vocabulary::{contains_any, normalize};

    const ALL_STAGES: [NvcStage; 6] = [
        NvcStage::Starting,
        NvcStage::Observation,
        NvcStage::Feeling,
        NvcStage::Need,
        NvcStage::Request,
        NvcStage::Complete,
    ];

    #[test]
    fn feeling_stage_offers_feeling_words() {
        let guidance = StageGuidance::for_stage(NvcStage::Feeling);
        assert!(guidance.vocabulary_options.contains(&"frustrated".to_string()));
        assert!(guidance.vocabulary_options.contains(&"grateful".to_string()));
    }

    #[test]
    fn need_stage_offers_need_words() {
        let guidance = StageGuidance::for_stage(NvcStage::Need);
        assert!(guidance.vocabulary_options.contains(&"respect".to_string()));
    }

    #[test]
    fn every_stage_has_prompt_and_suggestions() {
        for stage in ALL_STAGES {
            let guidance = StageGuidance::for_stage(stage);
            assert_eq!(guidance.stage, stage);
            assert!(!guidance.prompt.is_empty());
            assert!(!guidance.suggested_responses.is_empty());
        }
    }

    #[test]
    fn reply_acknowledges_detected_stage() {
        let guidance = StageGuidance::for_stage(NvcStage::Need);
        let reply = guidance.compose_reply(NvcStage::Feeling);
        assert!(reply.starts_with("It sounds like"));
        assert!(reply.ends_with(guidance.prompt));
    }

    #[test]
    fn reply_without_detection_is_just_the_prompt() {
        let guidance = StageGuidance::for_stage(NvcStage::Observation);
        assert_eq!(guidance.compose_reply(NvcStage::Starting), guidance.prompt);
    }

    #[test]
    fn replies_never_contain_a_specific_request_phrase() {
        // Replies are echoed back in the history the completion gate scans
        for target in ALL_STAGES {
            let guidance = StageGuidance::for_stage(target);
            for detected in ALL_STAGES {
                let reply = normalize(&guidance.compose_reply(detected));
                assert!(
                    !contains_any(SPECIFIC_REQUEST_PHRASES, &reply),
                    "{target} / {detected}: {reply}"
                );
            }
        }
    }
}
