//! Speech synthesis endpoint
//!
//! No fallback here; the client's speech output selector is the only
//! fallback point.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, ApiState, json_body};

/// Build speech router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/tts", post(synthesize))
        .with_state(state)
}

/// Synthesis request
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<Value>,
}

/// Synthesize text to speech
///
/// Returns audio in MP3 format
async fn synthesize(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(payload)?;

    let text = match request.text {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(_) => {
            tracing::error!("TTS text is not a string");
            return Err(ApiError::SynthesisFailed);
        }
    };
    if text.is_empty() {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    }

    let Some(synthesizer) = state.tts.as_ref() else {
        tracing::error!("TTS requested but no synthesizer is configured");
        return Err(ApiError::SynthesisFailed);
    };

    let audio = synthesizer.synthesize(&text).await.map_err(|e| {
        tracing::error!(error = %e, provider = synthesizer.name(), "speech synthesis failed");
        ApiError::SynthesisFailed
    })?;

    tracing::debug!(bytes = audio.len(), "speech synthesized");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio,
    )
        .into_response())
}
