//! HTTP client for a running Uncover gateway

use async_trait::async_trait;
use serde::Serialize;

use crate::dialogue::{Turn, TurnReply};
use crate::voice::SpeechSynthesizer;
use crate::{Error, Result};

/// Anything that can answer a dialogue turn for the client loop
#[async_trait]
pub trait DialogueClient: Send + Sync {
    /// Send a message with the full history
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the gateway cannot be reached or answers with an error
    async fn ask(&self, message: &str, history: &[Turn]) -> Result<TurnReply>;
}

/// Talks to `/api/ask` and `/api/tts` on a gateway
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AskBody<'a> {
    message: &'a str,
    conversation_history: &'a [Turn],
}

#[derive(Serialize)]
struct TtsBody<'a> {
    text: &'a str,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url` (e.g. `http://localhost:3000`)
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Gateway base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DialogueClient for GatewayClient {
    async fn ask(&self, message: &str, history: &[Turn]) -> Result<TurnReply> {
        let response = self
            .client
            .post(format!("{}/api/ask", self.base_url))
            .json(&AskBody {
                message,
                conversation_history: history,
            })
            .send()
            .await
            .map_err(|e| Error::Transport(format!("gateway unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "HTTP error! status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("invalid gateway response: {e}")))
    }
}

#[async_trait]
impl SpeechSynthesizer for GatewayClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(format!("{}/api/tts", self.base_url))
            .json(&TtsBody { text })
            .send()
            .await
            .map_err(|e| Error::Tts(format!("gateway unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Tts(format!(
                "gateway TTS failed with status {}",
                response.status()
            )));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(Error::Tts("gateway returned empty audio".to_string()));
        }

        Ok(audio.to_vec())
    }

    fn name(&self) -> &'static str {
        "gateway"
    }
}
