//! Audio playback through a local player command

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::{Error, Result};

/// Plays encoded audio and waits for it to finish
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if the audio cannot be decoded or played
    async fn play(&self, audio: &[u8]) -> Result<()>;

    /// Player name for logging
    fn name(&self) -> &'static str;
}

/// Known players and the flags that make them play once, headless and quiet
const PLAYERS: &[(&str, &[&str])] = &[
    ("mpv", &["--no-video", "--really-quiet"]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("afplay", &[]),
    ("mpg123", &["-q"]),
];

/// Plays MP3 through the first player found on `PATH`
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: PathBuf,
    name: &'static str,
    flags: &'static [&'static str],
}

impl CommandPlayer {
    /// Find an audio player on `PATH`
    #[must_use]
    pub fn detect() -> Option<Self> {
        PLAYERS.iter().find_map(|&(bin, flags)| {
            which::which(bin).ok().map(|program| {
                tracing::debug!(program = %program.display(), "audio player available");
                Self {
                    program,
                    name: bin,
                    flags,
                }
            })
        })
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, audio: &[u8]) -> Result<()> {
        if audio.is_empty() {
            return Err(Error::Playback("empty audio".to_string()));
        }

        // Players read from a path; keep the file alive until the player exits
        let mut file = tempfile::Builder::new()
            .prefix("uncover-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(audio)?;
        file.flush()?;

        let status = tokio::process::Command::new(&self.program)
            .args(self.flags)
            .arg(file.path())
            .status()
            .await
            .map_err(|e| Error::Playback(format!("failed to run {}: {e}", self.name)))?;

        if !status.success() {
            return Err(Error::Playback(format!("{} exited with {status}", self.name)));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
