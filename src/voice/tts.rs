//! Text-to-speech (TTS) synthesis

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Default ElevenLabs API base
pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Default ElevenLabs model
pub const DEFAULT_ELEVENLABS_MODEL: &str = "eleven_monolingual_v1";

/// Produces encoded audio (MP3) for a piece of text
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize text to speech
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service rejects it
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Voice tuning sent with every ElevenLabs request
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.8,
            style: 0.2,
            use_speaker_boost: true,
        }
    }
}

/// Synthesizes speech through the ElevenLabs API
pub struct ElevenLabsTts {
    client: reqwest::Client,
    api_key: SecretString,
    voice_id: String,
    model: String,
    base_url: String,
    settings: VoiceSettings,
}

impl ElevenLabsTts {
    /// Create a new ElevenLabs TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if API key or voice is missing
    pub fn new(api_key: SecretString, voice_id: String) -> Result<Self> {
        Self::with_options(
            api_key,
            voice_id,
            DEFAULT_ELEVENLABS_MODEL.to_string(),
            DEFAULT_ELEVENLABS_BASE_URL,
            None,
        )
    }

    /// Create a new ElevenLabs TTS instance with custom model, base URL and timeout
    ///
    /// # Errors
    ///
    /// Returns error if API key or voice is missing, or the HTTP client cannot be built
    pub fn with_options(
        api_key: SecretString,
        voice_id: String,
        model: String,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }
        if voice_id.is_empty() {
            return Err(Error::Config(
                "ElevenLabs voice ID required for TTS".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            voice_id,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            settings: VoiceSettings::default(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
            voice_settings: VoiceSettings,
        }

        let url = format!("{}/text-to-speech/{}", self.base_url, self.voice_id);

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model,
            voice_settings: self.settings,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret())
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(format!("ElevenLabs request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }

    fn name(&self) -> &'static str {
        "elevenlabs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_rejected() {
        let no_key = ElevenLabsTts::new(SecretString::from(String::new()), "voice".to_string());
        assert!(matches!(no_key, Err(Error::Config(_))));

        let no_voice = ElevenLabsTts::new(SecretString::from("key".to_string()), String::new());
        assert!(matches!(no_voice, Err(Error::Config(_))));
    }

    #[test]
    fn default_voice_settings() {
        let json = serde_json::to_value(VoiceSettings::default()).unwrap();
        assert_eq!(json["stability"], 0.5);
        assert_eq!(json["use_speaker_boost"], true);
    }
}
