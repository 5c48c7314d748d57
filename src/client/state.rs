//! Client interaction state machine

use crate::{Error, Result};

/// Where the client is in a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Waiting for the user to start speaking
    Idle,
    /// Capturing speech
    Listening,
    /// Waiting on the gateway
    Thinking,
    /// Narrating the reply
    Speaking,
    /// Capture failed; the next start recovers
    Error,
}

impl ClientState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
            Self::Error => "error",
        }
    }

    /// Status line shown to the user
    #[must_use]
    pub const fn status_text(self) -> &'static str {
        match self {
            Self::Idle => "Tap the button to continue sharing",
            Self::Listening => "Listening... share what's on your mind",
            Self::Thinking => "AI is thinking...",
            Self::Speaking => "AI is responding...",
            Self::Error => "Something went wrong, try again",
        }
    }
}

/// Inputs that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    StartListening,
    /// Capture ended without usable speech
    CaptureCancelled,
    TranscriptReceived,
    ReplyReceived,
    PlaybackFinished,
    CaptureFailed,
}

impl ClientEvent {
    const fn as_str(self) -> &'static str {
        match self {
            Self::StartListening => "start_listening",
            Self::CaptureCancelled => "capture_cancelled",
            Self::TranscriptReceived => "transcript_received",
            Self::ReplyReceived => "reply_received",
            Self::PlaybackFinished => "playback_finished",
            Self::CaptureFailed => "capture_failed",
        }
    }
}

/// Tracks the client state and rejects out-of-order events
#[derive(Debug)]
pub struct ClientStateMachine {
    state: ClientState,
}

impl Default for ClientStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientStateMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ClientState::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ClientState {
        self.state
    }

    /// Apply an event and return the new state
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] if the event is not valid in the current state
    pub fn apply(&mut self, event: ClientEvent) -> Result<ClientState> {
        use ClientEvent as E;
        use ClientState as S;

        let next = match (self.state, event) {
            (_, E::CaptureFailed) => S::Error,
            (S::Idle | S::Error, E::StartListening) => S::Listening,
            (S::Listening, E::CaptureCancelled) | (S::Speaking, E::PlaybackFinished) => S::Idle,
            (S::Listening, E::TranscriptReceived) => S::Thinking,
            (S::Thinking, E::ReplyReceived) => S::Speaking,
            (from, event) => {
                return Err(Error::InvalidTransition {
                    from: from.as_str(),
                    event: event.as_str(),
                });
            }
        };

        tracing::trace!(
            from = self.state.as_str(),
            to = next.as_str(),
            event = event.as_str(),
            "client transition"
        );
        self.state = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_turn_returns_to_idle() {
        let mut machine = ClientStateMachine::new();
        assert_eq!(machine.state(), ClientState::Idle);

        assert_eq!(
            machine.apply(ClientEvent::StartListening).unwrap(),
            ClientState::Listening
        );
        assert_eq!(
            machine.apply(ClientEvent::TranscriptReceived).unwrap(),
            ClientState::Thinking
        );
        assert_eq!(
            machine.apply(ClientEvent::ReplyReceived).unwrap(),
            ClientState::Speaking
        );
        assert_eq!(
            machine.apply(ClientEvent::PlaybackFinished).unwrap(),
            ClientState::Idle
        );
    }

    #[test]
    fn capture_failure_from_any_state() {
        for setup in [
            &[][..],
            &[ClientEvent::StartListening][..],
            &[ClientEvent::StartListening, ClientEvent::TranscriptReceived][..],
        ] {
            let mut machine = ClientStateMachine::new();
            for event in setup {
                machine.apply(*event).unwrap();
            }
            assert_eq!(
                machine.apply(ClientEvent::CaptureFailed).unwrap(),
                ClientState::Error
            );
        }
    }

    #[test]
    fn error_recovers_on_start() {
        let mut machine = ClientStateMachine::new();
        machine.apply(ClientEvent::CaptureFailed).unwrap();
        assert_eq!(
            machine.apply(ClientEvent::StartListening).unwrap(),
            ClientState::Listening
        );
    }

    #[test]
    fn no_new_capture_while_thinking() {
        let mut machine = ClientStateMachine::new();
        machine.apply(ClientEvent::StartListening).unwrap();
        machine.apply(ClientEvent::TranscriptReceived).unwrap();

        let err = machine.apply(ClientEvent::StartListening).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: "thinking",
                event: "start_listening"
            }
        ));
        assert_eq!(machine.state(), ClientState::Thinking);
    }

    #[test]
    fn cancelled_capture_returns_to_idle() {
        let mut machine = ClientStateMachine::new();
        machine.apply(ClientEvent::StartListening).unwrap();
        assert_eq!(
            machine.apply(ClientEvent::CaptureCancelled).unwrap(),
            ClientState::Idle
        );
    }
}
