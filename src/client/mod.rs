//! Terminal client that drives a conversation against a gateway
//!
//! Transcripts come from a [`TranscriptSource`], replies from a
//! [`DialogueClient`], and narration goes through the
//! [`SpeechOutputSelector`]. The conversation history lives here for the
//! lifetime of the session and is sent with every turn.

mod gateway;
mod state;
mod transcript;

pub use gateway::{DialogueClient, GatewayClient};
pub use state::{ClientEvent, ClientState, ClientStateMachine};
pub use transcript::{LineTranscripts, TranscriptSource};

use std::sync::Arc;
use std::time::Duration;

use crate::Result;
use crate::dialogue::{IntentLabel, Turn};
use crate::voice::{SpeechOutcome, SpeechOutputSelector};

/// Pause between showing a reply and speaking it
pub const DEFAULT_SPEAK_DELAY: Duration = Duration::from_secs(1);

/// Shown and narrated when the gateway cannot be reached
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred. Please try again.";

/// Consecutive capture failures before the session gives up
const MAX_CAPTURE_FAILURES: usize = 3;

/// Who said a line of the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// Presents the conversation to the user
pub trait Renderer: Send + Sync {
    /// A line of the conversation
    fn message(&self, speaker: Speaker, text: &str);

    /// The client moved to a new state
    fn status(&self, state: ClientState);
}

/// Prints the conversation to stdout
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn message(&self, speaker: Speaker, text: &str) {
        match speaker {
            Speaker::User => println!("you> {text}"),
            Speaker::Assistant => println!("ai>  {text}"),
        }
    }

    fn status(&self, state: ClientState) {
        println!("[{}]", state.status_text());
    }
}

/// Result of one completed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Text shown and narrated
    pub text: String,
    /// Intent reported by the gateway, if it answered
    pub intent: Option<IntentLabel>,
    pub speech: SpeechOutcome,
}

/// Runs the listen, think, speak cycle one turn at a time
pub struct InteractionLoop<S> {
    transcripts: S,
    dialogue: Arc<dyn DialogueClient>,
    speech: SpeechOutputSelector,
    renderer: Arc<dyn Renderer>,
    machine: ClientStateMachine,
    history: Vec<Turn>,
    speak_delay: Duration,
}

impl<S: TranscriptSource> InteractionLoop<S> {
    #[must_use]
    pub fn new(
        transcripts: S,
        dialogue: Arc<dyn DialogueClient>,
        speech: SpeechOutputSelector,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            transcripts,
            dialogue,
            speech,
            renderer,
            machine: ClientStateMachine::new(),
            history: Vec::new(),
            speak_delay: DEFAULT_SPEAK_DELAY,
        }
    }

    /// Override the pause between showing and speaking a reply
    #[must_use]
    pub const fn speak_delay(mut self, delay: Duration) -> Self {
        self.speak_delay = delay;
        self
    }

    /// Turns completed so far
    #[must_use]
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Current client state
    #[must_use]
    pub const fn state(&self) -> ClientState {
        self.machine.state()
    }

    /// Run until the transcript source is exhausted
    ///
    /// Returns the number of turns taken, including ones that hit a network error.
    ///
    /// # Errors
    ///
    /// Returns error if capture keeps failing or a state transition is out of order
    pub async fn run(&mut self) -> Result<usize> {
        let mut turns = 0;
        let mut failures = 0;

        loop {
            self.transition(ClientEvent::StartListening)?;

            let transcript = match self.transcripts.next_transcript().await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    self.transition(ClientEvent::CaptureCancelled)?;
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, failures, "speech capture failed");
                    self.transition(ClientEvent::CaptureFailed)?;
                    failures += 1;
                    if failures >= MAX_CAPTURE_FAILURES {
                        return Err(e);
                    }
                    continue;
                }
            };
            failures = 0;

            if transcript.trim().is_empty() {
                self.transition(ClientEvent::CaptureCancelled)?;
                continue;
            }

            self.take_turn(&transcript).await?;
            turns += 1;
        }

        tracing::info!(turns, "session ended");
        Ok(turns)
    }

    /// Send one transcript and narrate the reply
    ///
    /// The client must be listening.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidTransition`] if called outside the listening state
    pub async fn take_turn(&mut self, transcript: &str) -> Result<TurnOutcome> {
        self.transition(ClientEvent::TranscriptReceived)?;
        self.renderer.message(Speaker::User, transcript);

        let (text, intent) = match self.dialogue.ask(transcript, &self.history).await {
            Ok(reply) => {
                tracing::debug!(
                    intent = %reply.intent,
                    turn_count = reply.turn_count,
                    "reply received"
                );
                self.history.push(Turn::new(transcript, reply.response.clone()));
                (reply.response, Some(reply.intent))
            }
            Err(e) => {
                tracing::warn!(error = %e, "gateway request failed");
                (NETWORK_ERROR_MESSAGE.to_string(), None)
            }
        };

        self.renderer.message(Speaker::Assistant, &text);
        if !self.speak_delay.is_zero() {
            tokio::time::sleep(self.speak_delay).await;
        }

        self.transition(ClientEvent::ReplyReceived)?;
        let speech = self.speech.speak(&text).await;
        self.transition(ClientEvent::PlaybackFinished)?;

        Ok(TurnOutcome {
            text,
            intent,
            speech,
        })
    }

    fn transition(&mut self, event: ClientEvent) -> Result<()> {
        let state = self.machine.apply(event)?;
        self.renderer.status(state);
        Ok(())
    }
}
