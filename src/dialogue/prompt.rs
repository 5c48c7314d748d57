//! System prompt composition from intent and conversation stage

use super::IntentLabel;

/// Turn at which the model switches from probing to synthesizing
const SYNTHESIS_TURN: usize = 3;

const BASE_PROMPT: &str = "You are a friendly AI that helps people discover their true intentions and desires.
Your goal is to uncover the real reasons behind their surface-level wants and thoughts.

Rules:
- Use a warm, conversational tone
- Ask curious questions without judgment
- Only ask one question at a time
- Keep responses under 50 words
- Help them explore, don't provide solutions";

const GENERAL_GUIDANCE: &str =
    "Explore the deeper emotions or needs behind what they're sharing.";

const SYNTHESIZE_GUIDANCE: &str =
    "This is the 3rd turn or later. Try to synthesize insights from the conversation so far.";

const PROBE_GUIDANCE: &str = "Ask a deeper question to explore further.";

/// Intent-specific elaboration
const fn intent_guidance(intent: IntentLabel) -> &'static str {
    match intent {
        IntentLabel::Wanting => {
            "When someone wants something, explore the deeper reasons behind that desire."
        }
        IntentLabel::Frustrated => {
            "When someone expresses frustration, help them find the root cause."
        }
        IntentLabel::Uncertain => {
            "When someone is unsure, help them clarify what's causing the confusion."
        }
        IntentLabel::Escape => {
            "When someone wants to escape, explore what they really want to get away from."
        }
        IntentLabel::General | IntentLabel::Fallback => GENERAL_GUIDANCE,
    }
}

/// Stage directive for the current turn
const fn stage_guidance(turn_count: usize) -> &'static str {
    if turn_count >= SYNTHESIS_TURN {
        SYNTHESIZE_GUIDANCE
    } else {
        PROBE_GUIDANCE
    }
}

/// Build the system prompt for a turn
///
/// Layout: base rules, intent clause, stage directive, separated by blank lines.
#[must_use]
pub fn build_prompt(intent: IntentLabel, turn_count: usize) -> String {
    format!(
        "{BASE_PROMPT}\n\n{}\n\n{}",
        intent_guidance(intent),
        stage_guidance(turn_count)
    )
}
