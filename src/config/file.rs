//! TOML configuration file loading
//!
//! Supports `~/.config/uncover/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct UncoverConfigFile {
    /// Chat model configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Speech synthesis configuration
    #[serde(default)]
    pub tts: TtsFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// LLM-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds (unset = no timeout)
    pub timeout_secs: Option<u64>,
}

/// TTS-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct TtsFileConfig {
    /// ElevenLabs voice identifier
    pub voice_id: Option<String>,

    /// ElevenLabs model (e.g. "eleven_monolingual_v1")
    pub model: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds (unset = no timeout)
    pub timeout_secs: Option<u64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// HTTP port
    pub port: Option<u16>,

    /// Directory holding the web client
    pub static_dir: Option<PathBuf>,
}

/// Load the TOML config file from the standard path
///
/// Returns `UncoverConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> UncoverConfigFile {
    config_file_path().map_or_else(UncoverConfigFile::default, |path| load_from(&path))
}

/// Load a TOML config file from an explicit path
///
/// Missing or malformed files yield defaults.
pub fn load_from(path: &Path) -> UncoverConfigFile {
    if !path.exists() {
        return UncoverConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                UncoverConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            UncoverConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/uncover/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("uncover").join("config.toml"))
}
