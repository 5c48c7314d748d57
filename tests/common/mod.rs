//! Shared test utilities

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use uncover_gateway::api::ApiServerBuilder;
use uncover_gateway::dialogue::{LlmSettings, Orchestrator};
use uncover_gateway::llm::{ChatCompletion, CompletionRequest};
use uncover_gateway::voice::SpeechSynthesizer;
use uncover_gateway::{Error, Result};

/// Bytes that look enough like an MP3 frame for the tests
pub const FAKE_MP3: &[u8] = &[0xff, 0xfb, 0x90, 0x64, 0x00, 0x00];

/// Chat model with a canned answer, or a canned failure
pub struct MockChat {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl MockChat {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompletion for MockChat {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| Error::Llm("upstream returned 429".to_string()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Synthesizer returning [`FAKE_MP3`], or failing
pub struct MockTts {
    fail: bool,
}

impl MockTts {
    pub fn working() -> Arc<Self> {
        Arc::new(Self { fail: false })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true })
    }
}

#[async_trait]
impl SpeechSynthesizer for MockTts {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        if self.fail {
            return Err(Error::Tts("quota exceeded".to_string()));
        }
        Ok(FAKE_MP3.to_vec())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Build the full gateway router around the given upstreams
pub fn build_test_router(
    chat: Option<Arc<dyn ChatCompletion>>,
    tts: Option<Arc<dyn SpeechSynthesizer>>,
    static_dir: Option<PathBuf>,
) -> Router {
    let orchestrator = match chat {
        Some(chat) => Orchestrator::new(chat, LlmSettings::default()),
        None => Orchestrator::unconfigured(LlmSettings::default()),
    };

    ApiServerBuilder::new(0, orchestrator)
        .speech_synthesizer(tts)
        .static_dir(static_dir)
        .build()
        .router()
}

/// Serve `app` on an ephemeral local port
///
/// Returns the base URL and a sender that stops the server.
pub async fn spawn_server(app: Router) -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let local_addr = listener
        .local_addr()
        .expect("listener address should resolve");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("test server should run");
    });

    (format!("http://{local_addr}"), shutdown_tx)
}
