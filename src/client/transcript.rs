//! Transcript sources for the client loop

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use crate::Result;

/// Produces one transcript per captured utterance
#[async_trait]
pub trait TranscriptSource: Send {
    /// Wait for the next utterance
    ///
    /// `Ok(None)` ends the session.
    ///
    /// # Errors
    ///
    /// Returns error if capture fails
    async fn next_transcript(&mut self) -> Result<Option<String>>;
}

/// Reads one utterance per line, e.g. from stdin or a dictation tool's pipe
pub struct LineTranscripts<R> {
    lines: Lines<BufReader<R>>,
}

impl<R: AsyncRead + Unpin + Send> LineTranscripts<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }
}

impl LineTranscripts<tokio::io::Stdin> {
    /// Read transcripts from standard input
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> TranscriptSource for LineTranscripts<R> {
    async fn next_transcript(&mut self) -> Result<Option<String>> {
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}
