//! Platform speech synthesis (the secondary speech path)
//!
//! Uses whatever speech command the host provides: `say` on macOS,
//! `espeak-ng`/`espeak` or `spd-say` on Linux.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{Error, Result};

/// Fixed voice parameters for platform speech
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    pub language: &'static str,
    /// Relative speaking rate, 1.0 is the platform default
    pub rate: f32,
    /// Relative pitch, 1.0 is the platform default
    pub pitch: f32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            language: "en-US",
            rate: 0.9,
            pitch: 1.0,
        }
    }
}

/// Locally available speech synthesis
#[async_trait]
pub trait PlatformSpeech: Send + Sync {
    /// Speak text aloud and wait until it finishes
    ///
    /// # Errors
    ///
    /// Returns error if the platform synthesizer fails
    async fn speak(&self, text: &str, params: &VoiceParams) -> Result<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Words per minute at rate 1.0 for `say` and `espeak`
const DEFAULT_WPM: f32 = 180.0;

/// Speech command flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Say,
    Espeak,
    SpdSay,
}

/// Candidate binaries in lookup order
const CANDIDATES: &[(&str, Flavor)] = &[
    ("say", Flavor::Say),
    ("espeak-ng", Flavor::Espeak),
    ("espeak", Flavor::Espeak),
    ("spd-say", Flavor::SpdSay),
];

/// Platform speech through an OS command
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    program: PathBuf,
    flavor: Flavor,
}

impl CommandSpeech {
    /// Find a speech command on `PATH`
    ///
    /// Returns `None` when the host has no speech capability.
    #[must_use]
    pub fn detect() -> Option<Self> {
        CANDIDATES.iter().find_map(|(bin, flavor)| {
            which::which(bin).ok().map(|program| {
                tracing::debug!(program = %program.display(), "platform speech available");
                Self {
                    program,
                    flavor: *flavor,
                }
            })
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn args(&self, text: &str, params: &VoiceParams) -> Vec<String> {
        match self.flavor {
            Flavor::Say => vec![
                "-r".to_string(),
                format!("{}", (DEFAULT_WPM * params.rate).round() as i32),
                text.to_string(),
            ],
            Flavor::Espeak => vec![
                "-v".to_string(),
                params.language.to_lowercase(),
                "-s".to_string(),
                format!("{}", (DEFAULT_WPM * params.rate).round() as i32),
                "-p".to_string(),
                format!("{}", (50.0 * params.pitch).round().clamp(0.0, 99.0) as i32),
                text.to_string(),
            ],
            Flavor::SpdSay => vec![
                "-w".to_string(),
                "-l".to_string(),
                params
                    .language
                    .split('-')
                    .next()
                    .unwrap_or(params.language)
                    .to_string(),
                "-r".to_string(),
                format!("{}", ((params.rate - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32),
                "-p".to_string(),
                format!("{}", ((params.pitch - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32),
                text.to_string(),
            ],
        }
    }
}

#[async_trait]
impl PlatformSpeech for CommandSpeech {
    async fn speak(&self, text: &str, params: &VoiceParams) -> Result<()> {
        let status = tokio::process::Command::new(&self.program)
            .args(self.args(text, params))
            .status()
            .await
            .map_err(|e| {
                Error::PlatformSpeech(format!("failed to run {}: {e}", self.program.display()))
            })?;

        if !status.success() {
            return Err(Error::PlatformSpeech(format!(
                "{} exited with {status}",
                self.program.display()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        match self.flavor {
            Flavor::Say => "say",
            Flavor::Espeak => "espeak",
            Flavor::SpdSay => "spd-say",
        }
    }
}
