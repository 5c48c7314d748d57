//! Voice output
//!
//! Hosted TTS synthesis, local playback, platform speech, and the selector
//! that falls back from one to the other.

mod output;
mod platform;
mod playback;
mod tts;

pub use output::{PrimarySpeech, SpeechOutcome, SpeechOutputSelector};
pub use platform::{CommandSpeech, PlatformSpeech, VoiceParams};
pub use playback::{AudioPlayer, CommandPlayer};
pub use tts::{
    DEFAULT_ELEVENLABS_BASE_URL, DEFAULT_ELEVENLABS_MODEL, ElevenLabsTts, SpeechSynthesizer,
    VoiceSettings,
};
