//! Error types for the Uncover gateway

use thiserror::Error;

/// Result type alias for Uncover operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Uncover gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Required request input missing or empty
    #[error("{0}")]
    InvalidInput(String),

    /// Chat completion upstream failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// Text-to-speech upstream failure
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio playback failure
    #[error("playback error: {0}")]
    Playback(String),

    /// Platform speech synthesis failure
    #[error("platform speech error: {0}")]
    PlatformSpeech(String),

    /// Client could not reach the gateway
    #[error("transport error: {0}")]
    Transport(String),

    /// Client state machine rejected a transition
    #[error("invalid transition from {from} on {event}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
