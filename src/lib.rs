//! Uncover Gateway - Voice-driven self-discovery conversations
//!
//! This library provides the core functionality for the Uncover gateway:
//! - Dialogue orchestration (intent classification, prompt staging, fallback prompts)
//! - LLM access via OpenAI-compatible chat completions
//! - Speech synthesis via ElevenLabs, with platform speech as a fallback
//! - The HTTP API and a terminal client that drives it
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     Clients                          │
//! │       Web client (static)  │  Terminal `chat`        │
//! └────────────────────┬────────────────────────────────┘
//!                      │  /api/ask  /api/tts
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Uncover Gateway                      │
//! │   Intent  │  Prompt  │  Orchestrator  │  TTS proxy   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                    Upstreams                         │
//! │        OpenAI chat completions  │  ElevenLabs        │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod llm;
pub mod voice;

pub use config::Config;
pub use dialogue::{IntentLabel, Orchestrator, Turn, TurnReply, build_prompt, classify};
pub use error::{Error, Result};
