//! Chat completion port
//!
//! The orchestrator talks to the hosted model through [`ChatCompletion`] so
//! that the upstream can be swapped or mocked.

mod openai;

pub use openai::{DEFAULT_OPENAI_BASE_URL, OpenAiChat};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Role-tagged chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A single completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Hosted chat model
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Run a completion and return the first choice's text
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a
    /// response without usable content
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
