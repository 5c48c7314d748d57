//! Health check endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness response
///
/// Always `ok`: missing upstreams degrade the experience but never block it.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Serialize)]
pub struct ReadinessChecks {
    pub llm: CheckResult,
    pub tts: CheckResult,
}

/// Result of a single health check
#[derive(Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    const fn ok() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }

    fn unavailable(message: &str) -> Self {
        Self {
            status: "unavailable",
            message: Some(message.to_string()),
        }
    }
}

/// Liveness probe - is the service running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - which upstreams are configured?
async fn ready(State(state): State<Arc<ApiState>>) -> Json<ReadinessResponse> {
    let llm = if state.orchestrator.is_configured() {
        CheckResult::ok()
    } else {
        CheckResult::unavailable("no chat model configured, using fallback prompts")
    };

    let tts = if state.tts.is_some() {
        CheckResult::ok()
    } else {
        CheckResult::unavailable("no speech synthesizer configured")
    };

    Json(ReadinessResponse {
        status: "ok",
        checks: ReadinessChecks { llm, tts },
    })
}

/// Build health router
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Build readiness router
pub fn ready_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
}
