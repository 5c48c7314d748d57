//! Configuration management for the Uncover gateway
//!
//! Precedence, lowest first: built-in defaults, `config.toml`, `.env`,
//! process environment. CLI flags override the result in `main.rs`.

pub mod file;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::dialogue::{DEFAULT_MODEL, LlmSettings, MAX_OUTPUT_TOKENS, Orchestrator, TEMPERATURE};
use crate::llm::{ChatCompletion, DEFAULT_OPENAI_BASE_URL, OpenAiChat};
use crate::voice::{
    DEFAULT_ELEVENLABS_BASE_URL, DEFAULT_ELEVENLABS_MODEL, ElevenLabsTts, SpeechSynthesizer,
};
use file::UncoverConfigFile;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default directory for the web client
pub const DEFAULT_STATIC_DIR: &str = "client";

/// Uncover gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Chat model configuration
    pub llm: LlmConfig,

    /// Speech synthesis configuration
    pub tts: TtsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Path to static files directory (web client)
    pub static_dir: PathBuf,
}

/// Chat model configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `OpenAI` API key (from `OPENAI_API_KEY`)
    pub api_key: Option<SecretString>,

    /// Model identifier
    pub model: String,

    /// API base URL
    pub base_url: String,

    /// Optional request timeout
    pub timeout: Option<Duration>,
}

/// Speech synthesis configuration
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// ElevenLabs API key (from `ELEVENLABS_API_KEY`)
    pub api_key: Option<SecretString>,

    /// ElevenLabs voice (from `ELEVENLABS_VOICE_ID`)
    pub voice_id: Option<String>,

    /// ElevenLabs model
    pub model: String,

    /// API base URL
    pub base_url: String,

    /// Optional request timeout
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from the config file, `.env` and the environment
    #[must_use]
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to load .env"),
        }

        Self::from_sources(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed file and an environment lookup
    ///
    /// Environment values win over file values; empty values count as unset.
    pub fn from_sources(file: UncoverConfigFile, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = env("PORT")
            .and_then(|s| s.parse().ok())
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        let static_dir = env("UNCOVER_STATIC_DIR")
            .map(PathBuf::from)
            .or(file.server.static_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let llm = LlmConfig {
            api_key: env("OPENAI_API_KEY")
                .or(file.api_keys.openai)
                .map(SecretString::from),
            model: env("UNCOVER_LLM_MODEL")
                .or(file.llm.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: env("OPENAI_BASE_URL")
                .or(file.llm.base_url)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            timeout: file.llm.timeout_secs.map(Duration::from_secs),
        };

        let tts = TtsConfig {
            api_key: env("ELEVENLABS_API_KEY")
                .or(file.api_keys.elevenlabs)
                .map(SecretString::from),
            voice_id: env("ELEVENLABS_VOICE_ID").or(file.tts.voice_id),
            model: file
                .tts
                .model
                .unwrap_or_else(|| DEFAULT_ELEVENLABS_MODEL.to_string()),
            base_url: env("ELEVENLABS_BASE_URL")
                .or(file.tts.base_url)
                .unwrap_or_else(|| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
            timeout: file.tts.timeout_secs.map(Duration::from_secs),
        };

        Self {
            server: ServerConfig { port, static_dir },
            llm,
            tts,
        }
    }

    /// Chat model parameters
    #[must_use]
    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            model: self.llm.model.clone(),
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }

    /// Build the chat client, if credentials are present
    ///
    /// Missing or unusable credentials are logged, not fatal: the
    /// orchestrator then answers every turn with a fallback prompt.
    #[must_use]
    pub fn chat_client(&self) -> Option<Arc<dyn ChatCompletion>> {
        let Some(api_key) = self.llm.api_key.clone() else {
            tracing::warn!("OPENAI_API_KEY not set, chat will use fallback prompts");
            return None;
        };

        match OpenAiChat::with_base_url(api_key, &self.llm.base_url, self.llm.timeout) {
            Ok(chat) => Some(Arc::new(chat)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "chat client unavailable, chat will use fallback prompts"
                );
                None
            }
        }
    }

    /// Build the dialogue orchestrator
    #[must_use]
    pub fn orchestrator(&self) -> Orchestrator {
        self.chat_client().map_or_else(
            || Orchestrator::unconfigured(self.llm_settings()),
            |chat| Orchestrator::new(chat, self.llm_settings()),
        )
    }

    /// Build the speech synthesizer, if credentials are present
    #[must_use]
    pub fn speech_synthesizer(&self) -> Option<Arc<dyn SpeechSynthesizer>> {
        let (Some(api_key), Some(voice_id)) = (self.tts.api_key.clone(), self.tts.voice_id.clone())
        else {
            tracing::warn!(
                "ELEVENLABS_API_KEY or ELEVENLABS_VOICE_ID not set, TTS requests will fail"
            );
            return None;
        };

        match ElevenLabsTts::with_options(
            api_key,
            voice_id,
            self.tts.model.clone(),
            &self.tts.base_url,
            self.tts.timeout,
        ) {
            Ok(tts) => Some(Arc::new(tts)),
            Err(e) => {
                tracing::warn!(error = %e, "TTS client unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_sources() {
        let config = Config::from_sources(UncoverConfigFile::default(), env_from(&[]));

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.base_url, DEFAULT_OPENAI_BASE_URL);
        assert!(config.llm.api_key.is_none());
        assert!(config.llm.timeout.is_none());
        assert!(config.tts.voice_id.is_none());
        assert_eq!(config.tts.model, DEFAULT_ELEVENLABS_MODEL);
    }

    #[test]
    fn env_overrides_file() {
        let file: UncoverConfigFile = toml::from_str(
            r#"
            [server]
            port = 4000
            static_dir = "web"

            [api_keys]
            openai = "sk-file"

            [tts]
            voice_id = "file-voice"
            timeout_secs = 30
            "#,
        )
        .unwrap();

        let config = Config::from_sources(
            file,
            env_from(&[("PORT", "5000"), ("ELEVENLABS_VOICE_ID", "env-voice")]),
        );

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.static_dir, PathBuf::from("web"));
        assert_eq!(config.llm.api_key.as_ref().unwrap().expose_secret(), "sk-file");
        assert_eq!(config.tts.voice_id.as_deref(), Some("env-voice"));
        assert_eq!(config.tts.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn empty_env_values_are_unset() {
        let config = Config::from_sources(
            UncoverConfigFile::default(),
            env_from(&[("OPENAI_API_KEY", ""), ("PORT", "not-a-port")]),
        );

        assert!(config.llm.api_key.is_none());
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn missing_credentials_yield_no_clients() {
        let config = Config::from_sources(UncoverConfigFile::default(), env_from(&[]));

        assert!(config.chat_client().is_none());
        assert!(config.speech_synthesizer().is_none());
    }

    #[test]
    fn credentials_yield_clients() {
        let config = Config::from_sources(
            UncoverConfigFile::default(),
            env_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("ELEVENLABS_API_KEY", "xi-test"),
                ("ELEVENLABS_VOICE_ID", "voice"),
            ]),
        );

        assert_eq!(config.chat_client().unwrap().name(), "openai");
        assert_eq!(config.speech_synthesizer().unwrap().name(), "elevenlabs");
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let config = Config::from_sources(
            UncoverConfigFile::default(),
            env_from(&[("OPENAI_API_KEY", "sk-very-secret")]),
        );

        assert!(!format!("{config:?}").contains("sk-very-secret"));
    }
}
