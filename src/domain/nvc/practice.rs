//! Worked NVC statements offered as practice material.

use serde::Serialize;

/// One situation expressed in all four NVC components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PracticeExample {
    pub situation: &'static str,
    pub observation: &'static str,
    pub feeling: &'static str,
    pub need: &'static str,
    pub request: &'static str,
}

pub const PRACTICE_EXAMPLES: &[PracticeExample] = &[
    PracticeExample {
        situation: "A colleague keeps interrupting in meetings",
        observation: "In this morning's meeting, you started speaking before I finished three times.",
        feeling: "I feel frustrated and unheard.",
        need: "I need respect and a chance to contribute.",
        request: "Would you be willing to let me finish before you respond?",
    },
    PracticeExample {
        situation: "A housemate leaves dishes in the sink",
        observation: "When I came home yesterday, there were dishes in the sink from the weekend.",
        feeling: "I felt tired and discouraged.",
        need: "I need order and cooperation in our shared space.",
        request: "Could you please wash your dishes by the end of each day?",
    },
    PracticeExample {
        situation: "A partner is often late without calling",
        observation: "Last night you arrived forty minutes after the time we agreed.",
        feeling: "I felt worried and then hurt.",
        need: "I need reassurance and predictability.",
        request: "Would you be willing to text me if you're running more than ten minutes late?",
    },
    PracticeExample {
        situation: "A friend helped you move",
        observation: "You spent all of Saturday carrying boxes with me.",
        feeling: "I feel grateful and touched.",
        need: "It met my need for support and connection.",
        request: "Would you be willing to let me cook dinner for you next week?",
    },
];
