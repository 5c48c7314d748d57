//! Speech output with one-level fallback
//!
//! ```text
//!   text ──► Primary (synthesize + play) ──ok──► Primary
//!                 │ any failure
//!                 ▼
//!            Secondary (platform speech) ──ok──► Fallback
//!                 │ missing or failed
//!                 ▼
//!               Silent
//! ```

use std::sync::Arc;

use super::{AudioPlayer, PlatformSpeech, SpeechSynthesizer, VoiceParams};
use crate::Result;

/// Which path produced (or failed to produce) audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Hosted voice synthesized and played
    Primary,
    /// Primary failed; platform speech spoke the text
    Fallback,
    /// No audio was produced
    Silent,
}

/// Hosted synthesis followed by local playback
pub struct PrimarySpeech {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    player: Arc<dyn AudioPlayer>,
}

impl PrimarySpeech {
    #[must_use]
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            synthesizer,
            player,
        }
    }

    /// One attempt: fetch then play; either failing fails the attempt
    async fn attempt(&self, text: &str) -> Result<()> {
        let audio = self.synthesizer.synthesize(text).await?;
        self.player.play(&audio).await
    }
}

/// Chooses between hosted voice and platform speech
pub struct SpeechOutputSelector {
    primary: Option<PrimarySpeech>,
    secondary: Option<Arc<dyn PlatformSpeech>>,
    params: VoiceParams,
}

impl SpeechOutputSelector {
    #[must_use]
    pub fn new(primary: Option<PrimarySpeech>, secondary: Option<Arc<dyn PlatformSpeech>>) -> Self {
        Self {
            primary,
            secondary,
            params: VoiceParams::default(),
        }
    }

    /// Selector that never produces audio
    #[must_use]
    pub fn silent() -> Self {
        Self::new(None, None)
    }

    /// Speak `text`, falling back at most once
    ///
    /// Never fails; every failure degrades to the next path or to silence.
    pub async fn speak(&self, text: &str) -> SpeechOutcome {
        if let Some(primary) = &self.primary {
            match primary.attempt(text).await {
                Ok(()) => return SpeechOutcome::Primary,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        synthesizer = primary.synthesizer.name(),
                        player = primary.player.name(),
                        "primary speech failed, falling back to platform speech"
                    );
                }
            }
        }

        let Some(secondary) = &self.secondary else {
            tracing::debug!("no platform speech available");
            return SpeechOutcome::Silent;
        };

        match secondary.speak(text, &self.params).await {
            Ok(()) => SpeechOutcome::Fallback,
            Err(e) => {
                tracing::warn!(error = %e, backend = secondary.name(), "platform speech failed");
                SpeechOutcome::Silent
            }
        }
    }
}
