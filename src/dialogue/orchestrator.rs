//! Dialogue orchestration with local recovery from chat upstream failures

use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::{IntentLabel, Turn, build_prompt, classify};
use crate::llm::{ChatCompletion, ChatMessage, CompletionRequest};
use crate::{Error, Result};

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for every turn
pub const TEMPERATURE: f32 = 0.8;

/// Output cap for every turn
pub const MAX_OUTPUT_TOKENS: u32 = 100;

/// Scripted prompts used when the chat upstream is unavailable
pub const FALLBACK_RESPONSES: &[&str] = &[
    "Can you tell me more about that?",
    "How did that make you feel?",
    "What's really on your mind?",
    "Why do you think that is?",
];

/// Model parameters applied to every completion
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Result of one dialogue turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReply {
    pub response: String,
    pub intent: IntentLabel,
    pub turn_count: usize,
}

/// Composes prompts, calls the chat model and governs fallback
///
/// Holds no conversation state; every call is a function of the message and
/// the history the caller passes in.
pub struct Orchestrator {
    chat: Option<Arc<dyn ChatCompletion>>,
    settings: LlmSettings,
}

impl Orchestrator {
    /// Create an orchestrator backed by a chat model
    #[must_use]
    pub fn new(chat: Arc<dyn ChatCompletion>, settings: LlmSettings) -> Self {
        Self {
            chat: Some(chat),
            settings,
        }
    }

    /// Create an orchestrator with no chat model; every turn falls back
    #[must_use]
    pub fn unconfigured(settings: LlmSettings) -> Self {
        Self {
            chat: None,
            settings,
        }
    }

    /// Whether a chat model is attached
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.chat.is_some()
    }

    /// Handle one user turn
    ///
    /// Upstream failures never surface here: the reply degrades to a scripted
    /// prompt labeled [`IntentLabel::Fallback`]. Whitespace-only messages are
    /// forwarded like any other text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `message` is empty
    pub async fn handle_turn(&self, message: &str, history: &[Turn]) -> Result<TurnReply> {
        if message.is_empty() {
            return Err(Error::InvalidInput("Message is required".to_string()));
        }

        let intent = classify(message);
        let turn_count = history.len() + 1;

        tracing::debug!(%intent, turn_count, "handling turn");

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: build_messages(intent, turn_count, message, history),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let outcome = match &self.chat {
            Some(chat) => chat.complete(&request).await,
            None => Err(Error::Config("no chat model configured".to_string())),
        };

        match outcome {
            Ok(response) => Ok(TurnReply {
                response,
                intent,
                turn_count,
            }),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    turn_count,
                    "chat completion failed, using fallback prompt"
                );
                Ok(Self::fallback_reply(turn_count))
            }
        }
    }

    /// Scripted reply for a turn that could not reach the chat model
    #[must_use]
    pub fn fallback_reply(turn_count: usize) -> TurnReply {
        TurnReply {
            response: pick_fallback().to_string(),
            intent: IntentLabel::Fallback,
            turn_count,
        }
    }
}

/// System prompt, replayed history, then the new message
fn build_messages(
    intent: IntentLabel,
    turn_count: usize,
    message: &str,
    history: &[Turn],
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(build_prompt(intent, turn_count)));

    for turn in history {
        messages.push(ChatMessage::user(turn.user.clone()));
        messages.push(ChatMessage::assistant(turn.assistant.clone()));
    }

    messages.push(ChatMessage::user(message));
    messages
}

fn pick_fallback() -> &'static str {
    FALLBACK_RESPONSES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_RESPONSES[0])
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::llm::ChatRole;

    /// Records requests and replies with a canned result
    struct ScriptedChat {
        reply: Option<String>,
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl ScriptedChat {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(text.to_string()),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl ChatCompletion for ScriptedChat {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            self.reply
                .clone()
                .ok_or_else(|| Error::Llm("quota exceeded".to_string()))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn empty_message_rejected_before_upstream() {
        let chat = ScriptedChat::replying("hi");
        let orchestrator = Orchestrator::new(chat.clone(), LlmSettings::default());

        let err = orchestrator.handle_turn("", &[]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.to_string(), "Message is required");

        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whitespace_message_reaches_upstream() {
        let chat = ScriptedChat::replying("Take your time.");
        let orchestrator = Orchestrator::new(chat.clone(), LlmSettings::default());

        let reply = orchestrator.handle_turn("   ", &[]).await.unwrap();
        assert_eq!(reply.response, "Take your time.");
        assert_eq!(reply.intent, IntentLabel::General);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);

        let request = chat.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.messages.last().unwrap().content, "   ");
    }

    #[tokio::test]
    async fn successful_turn_reports_intent_and_count() {
        let chat = ScriptedChat::replying("What draws you to leaving?");
        let orchestrator = Orchestrator::new(chat.clone(), LlmSettings::default());

        let reply = orchestrator
            .handle_turn("I want to quit my job", &[])
            .await
            .unwrap();

        assert_eq!(reply.response, "What draws you to leaving?");
        assert_eq!(reply.intent, IntentLabel::Wanting);
        assert_eq!(reply.turn_count, 1);

        let request = chat.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, DEFAULT_MODEL);
        assert!((request.temperature - TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, MAX_OUTPUT_TOKENS);

        let system = &request.messages[0];
        assert_eq!(system.role, ChatRole::System);
        assert!(system.content.contains("deeper reasons behind that desire"));
        assert!(system.content.contains("Ask a deeper question"));
    }

    #[tokio::test]
    async fn history_replayed_in_order() {
        let chat = ScriptedChat::replying("ok");
        let orchestrator = Orchestrator::new(chat.clone(), LlmSettings::default());
        let history = vec![
            Turn::new("first", "reply one"),
            Turn::new("second", "reply two"),
        ];

        let reply = orchestrator.handle_turn("third", &history).await.unwrap();
        assert_eq!(reply.turn_count, 3);

        let request = chat.last_request.lock().unwrap().clone().unwrap();
        let roles: Vec<ChatRole> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::User,
            ]
        );
        let contents: Vec<&str> = request.messages[1..]
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec!["first", "reply one", "second", "reply two", "third"]
        );
        assert!(request.messages[0].content.contains("synthesize insights"));
    }

    #[tokio::test]
    async fn upstream_failure_falls_back() {
        let chat = ScriptedChat::failing();
        let orchestrator = Orchestrator::new(chat.clone(), LlmSettings::default());
        let history = vec![Turn::new("a", "b")];

        let reply = orchestrator
            .handle_turn("I'm tired of this", &history)
            .await
            .unwrap();

        assert!(FALLBACK_RESPONSES.contains(&reply.response.as_str()));
        assert_eq!(reply.intent, IntentLabel::Fallback);
        assert_eq!(reply.turn_count, 2);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unconfigured_always_falls_back() {
        let orchestrator = Orchestrator::unconfigured(LlmSettings::default());

        let reply = orchestrator.handle_turn("hello", &[]).await.unwrap();
        assert!(FALLBACK_RESPONSES.contains(&reply.response.as_str()));
        assert_eq!(reply.intent, IntentLabel::Fallback);
        assert_eq!(reply.turn_count, 1);
    }

    #[test]
    fn reply_serializes_camel_case() {
        let reply = TurnReply {
            response: "Why?".to_string(),
            intent: IntentLabel::General,
            turn_count: 2,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["turnCount"], 2);
        assert_eq!(json["intent"], "general");
        assert_eq!(json["response"], "Why?");
    }
}
