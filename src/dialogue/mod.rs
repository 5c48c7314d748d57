//! Turn-based dialogue: intent labeling, prompt composition and orchestration
//!
//! The server keeps no conversation state. The client owns the history and
//! replays it in full on every turn; the orchestrator is a function of
//! `(message, history)` plus one upstream call.

mod intent;
mod orchestrator;
mod prompt;

pub use intent::{IntentLabel, classify};
pub use orchestrator::{
    DEFAULT_MODEL, FALLBACK_RESPONSES, LlmSettings, MAX_OUTPUT_TOKENS, Orchestrator, TEMPERATURE,
    TurnReply,
};
pub use prompt::build_prompt;

use serde::{Deserialize, Serialize};

/// One user/assistant exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

impl Turn {
    /// Create a turn from a user utterance and the assistant's reply
    #[must_use]
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}
