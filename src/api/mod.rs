//! HTTP API server for the Uncover gateway

pub mod ask;
mod error;
pub mod health;
pub mod tts;

pub use error::{ApiError, ErrorResponse, json_body};

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::dialogue::Orchestrator;
use crate::voice::SpeechSynthesizer;

/// Shared state for API handlers
///
/// Immutable after startup; handlers share nothing mutable.
#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
    pub tts: Option<Arc<dyn SpeechSynthesizer>>,
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    port: u16,
    orchestrator: Orchestrator,
    tts: Option<Arc<dyn SpeechSynthesizer>>,
    static_dir: Option<PathBuf>,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub const fn new(port: u16, orchestrator: Orchestrator) -> Self {
        Self {
            port,
            orchestrator,
            tts: None,
            static_dir: None,
        }
    }

    /// Set the speech synthesizer behind `/api/tts`
    #[must_use]
    pub fn speech_synthesizer(mut self, tts: Option<Arc<dyn SpeechSynthesizer>>) -> Self {
        self.tts = tts;
        self
    }

    /// Set the static files directory for serving the web client
    #[must_use]
    pub fn static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let state = Arc::new(ApiState {
            orchestrator: Arc::new(self.orchestrator),
            tts: self.tts,
        });

        ApiServer {
            state,
            port: self.port,
            static_dir: self.static_dir,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let api = ask::router(self.state.clone()).merge(tts::router(self.state.clone()));

        let mut router = Router::new()
            .nest("/api", api)
            .merge(health::router())
            .merge(health::ready_router(self.state.clone()));

        // Serve static files if configured
        if let Some(static_dir) = &self.static_dir {
            if !static_dir.is_dir() {
                tracing::warn!(path = %static_dir.display(), "static directory does not exist");
            }

            let index_file = static_dir.join("index.html");
            router = router
                .route_service("/", ServeFile::new(&index_file))
                .fallback_service(ServeDir::new(static_dir));
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        // CORS layer for cross-origin requests from the web client
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router
            .layer(CatchPanicLayer::custom(error::handle_panic))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");
        tracing::info!("visit http://localhost:{} to start discovering", self.port);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
