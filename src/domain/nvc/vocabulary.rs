//! Static keyword tables for stage detection.
//!
//! Matching is plain substring containment over lowercased text, so a keyword
//! also matches inside a longer word ("need" matches "needed"). The tables
//! below are the behavioural contract of the classifier, completion gate and
//! summary extractor; change them with care.

use once_cell::sync::Lazy;
use std::sync::Arc;

use super::stage::NvcStage;

/// Cues that the speaker is describing what happened.
pub const OBSERVATION_KEYWORDS: &[&str] = &[
    "i noticed",
    "i saw",
    "i heard",
    "i observed",
    "i watched",
    "noticed",
    "observed",
    "when you",
    "when he",
    "when she",
    "when they",
    "yesterday",
    "today",
    "this morning",
    "last night",
    "last week",
    "earlier",
    "every time",
    "happened",
    "interrupted",
    "told me",
    "said",
];

/// Phrases that introduce a feeling.
pub const FEELING_CUES: &[&str] = &["i feel", "i felt", "i am feeling", "i'm feeling", "feel"];

/// Feelings likely present when needs are not being met.
pub const FEELINGS_NEEDS_UNMET: &[&str] = &[
    "afraid",
    "angry",
    "annoyed",
    "anxious",
    "confused",
    "disappointed",
    "discouraged",
    "embarrassed",
    "exhausted",
    "frustrated",
    "helpless",
    "hurt",
    "impatient",
    "irritated",
    "lonely",
    "nervous",
    "overwhelmed",
    "resentful",
    "sad",
    "scared",
    "stressed",
    "tense",
    "uncomfortable",
    "unheard",
    "upset",
    "worried",
];

/// Feelings likely present when needs are being met.
pub const FEELINGS_NEEDS_MET: &[&str] = &[
    "calm",
    "confident",
    "content",
    "curious",
    "excited",
    "grateful",
    "happy",
    "hopeful",
    "inspired",
    "joyful",
    "relieved",
    "satisfied",
    "serene",
    "touched",
];

/// Phrases that introduce a need.
pub const NEED_CUES: &[&str] = &["i need", "need", "important to me", "matters to me", "i value"];

/// Universal human needs.
pub const NEED_WORDS: &[&str] = &[
    "acceptance",
    "appreciation",
    "autonomy",
    "belonging",
    "choice",
    "clarity",
    "closeness",
    "collaboration",
    "communication",
    "connection",
    "consideration",
    "consistency",
    "cooperation",
    "empathy",
    "fairness",
    "honesty",
    "inclusion",
    "independence",
    "meaning",
    "mutuality",
    "order",
    "peace",
    "predictability",
    "reassurance",
    "recognition",
    "respect",
    "rest",
    "safety",
    "security",
    "space",
    "stability",
    "support",
    "to be heard",
    "to be seen",
    "to matter",
    "trust",
    "understanding",
    "value",
];

/// Cues that the speaker is asking for something.
pub const REQUEST_KEYWORDS: &[&str] = &[
    "would you be willing",
    "are you willing",
    "willing",
    "would you",
    "could you",
    "can you",
    "will you",
    "please",
    "i request",
    "my request",
    "i would like",
    "i'd like",
    "i'm asking",
    "i am asking",
    "can we",
    "could we",
];

/// Actionable request phrasings required before a conversation may complete.
///
/// Stricter than [`REQUEST_KEYWORDS`]: "please" alone isn't a request.
pub const SPECIFIC_REQUEST_PHRASES: &[&str] = &[
    "would you be willing",
    "are you willing",
    "could you please",
    "would you please",
    "can you please",
    "i request",
    "my request is",
    "i would like you to",
    "i'd like you to",
    "would it work for you",
];

/// Phrases in the latest message that end the conversation immediately.
pub const COMPLETION_PHRASES: &[&str] = &[
    "show me the summary",
    "show me my summary",
    "give me the summary",
    "i'm done",
    "i am done",
    "im done",
    "wrap this up",
    "wrap it up",
    "let's finish",
    "complete",
];

/// Sentence openers offered while working on an observation.
pub const OBSERVATION_STARTERS: &[&str] = &[
    "When I saw",
    "When I heard",
    "I noticed that",
    "Yesterday, when you",
    "The last three times",
];

static STANDARD: Lazy<Arc<VocabularyTable>> = Lazy::new(|| Arc::new(VocabularyTable::build()));

/// Lowercases text for matching and folds typographic apostrophes to `'`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Returns the words from `words` that occur in already-normalized `text`.
pub fn matching_words<'a>(words: &[&'a str], text: &str) -> Vec<&'a str> {
    words.iter().copied().filter(|w| text.contains(w)).collect()
}

/// Returns true if any phrase occurs in already-normalized `text`.
pub fn contains_any(phrases: &[&str], text: &str) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

/// Every feeling word, unmet-needs feelings first.
pub fn feeling_words() -> impl Iterator<Item = &'static str> {
    FEELINGS_NEEDS_UNMET
        .iter()
        .chain(FEELINGS_NEEDS_MET.iter())
        .copied()
}

/// Stage → keyword mapping, iterated in canonical component order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyTable {
    entries: Vec<(NvcStage, Vec<&'static str>)>,
    feeling_words: Vec<&'static str>,
    need_words: Vec<&'static str>,
}

impl VocabularyTable {
    /// The shared standard table, built on first use.
    pub fn standard() -> Arc<VocabularyTable> {
        Arc::clone(&STANDARD)
    }

    fn build() -> Self {
        let feeling_words: Vec<&'static str> = feeling_words().collect();
        let need_words = NEED_WORDS.to_vec();

        let feeling = FEELING_CUES
            .iter()
            .copied()
            .chain(feeling_words.iter().copied())
            .collect();
        let need = NEED_CUES
            .iter()
            .copied()
            .chain(need_words.iter().copied())
            .collect();

        Self {
            entries: vec![
                (NvcStage::Observation, OBSERVATION_KEYWORDS.to_vec()),
                (NvcStage::Feeling, feeling),
                (NvcStage::Need, need),
                (NvcStage::Request, REQUEST_KEYWORDS.to_vec()),
            ],
            feeling_words,
            need_words,
        }
    }

    /// Keywords for a component stage. Meta-states have none.
    pub fn keywords(&self, stage: NvcStage) -> &[&'static str] {
        self.entries
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, words)| words.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates `(stage, keywords)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (NvcStage, &[&'static str])> {
        self.entries.iter().map(|(s, w)| (*s, w.as_slice()))
    }

    /// Emotion words used for depth checks and vocabulary options.
    pub fn feeling_words(&self) -> &[&'static str] {
        &self.feeling_words
    }

    /// Need words used for depth checks and vocabulary options.
    pub fn need_words(&self) -> &[&'static str] {
        &self.need_words
    }

    /// Number of distinct keywords of `stage` contained in normalized `text`.
    pub fn count_matches(&self, stage: NvcStage, text: &str) -> usize {
        self.keywords(stage)
            .iter()
            .filter(|k| text.contains(*k))
            .count()
    }

    /// Returns true if normalized `text` contains any keyword of `stage`.
    pub fn mentions(&self, stage: NvcStage, text: &str) -> bool {
        contains_any(self.keywords(stage), text)
    }
}
