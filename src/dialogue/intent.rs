//! Keyword-based intent labeling

use serde::{Deserialize, Serialize};

/// Coarse category assigned to a user utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentLabel {
    Wanting,
    Frustrated,
    Uncertain,
    Escape,
    General,
    /// Reported when the chat upstream failed and a scripted prompt was used
    Fallback,
}

impl IntentLabel {
    /// Wire name of the label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wanting => "wanting",
            Self::Frustrated => "frustrated",
            Self::Uncertain => "uncertain",
            Self::Escape => "escape",
            Self::General => "general",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered rule table; the first label with a matching keyword wins
const INTENT_RULES: &[(IntentLabel, &[&str])] = &[
    (
        IntentLabel::Wanting,
        &["want", "wish", "need", "desire", "hoping", "trying to", "planning to"],
    ),
    (
        IntentLabel::Frustrated,
        &[
            "annoyed",
            "frustrated",
            "tired",
            "stressed",
            "exhausted",
            "overwhelmed",
            "fed up",
        ],
    ),
    (
        IntentLabel::Uncertain,
        &[
            "not sure",
            "confused",
            "uncertain",
            "doubt",
            "hesitant",
            "torn",
            "conflicted",
        ],
    ),
    (
        IntentLabel::Escape,
        &["escape", "get away", "leave", "quit", "give up", "avoid", "run away"],
    ),
];

/// Classify free text into an intent label
///
/// Matching is plain substring search over the lower-cased input, so
/// "Unwanted" matches `want` just as "I want" does.
#[must_use]
pub fn classify(text: &str) -> IntentLabel {
    let normalized = text.to_lowercase();

    INTENT_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map_or(IntentLabel::General, |(label, _)| *label)
}
