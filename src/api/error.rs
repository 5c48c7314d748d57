//! HTTP error envelope

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// API errors, rendered as `{ "error": "<message>" }`
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input (400)
    BadRequest(String),
    /// Upstream speech synthesis failed (500)
    SynthesisFailed,
    /// Anything else (500)
    Internal,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::SynthesisFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TTS generation failed".to_string(),
            ),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        match err {
            crate::Error::InvalidInput(msg) => Self::BadRequest(msg),
            crate::Error::Tts(_) => Self::SynthesisFailed,
            other => {
                tracing::error!(error = %other, "request failed");
                Self::Internal
            }
        }
    }
}

/// Unpack a JSON request body
///
/// A body sent without a JSON content type, or valid JSON that does not have
/// the request's shape, reads as an empty request so the route reports its
/// own missing field. Unparseable or unreadable bodies are server errors.
pub fn json_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(e)) => {
            tracing::debug!(error = %e, "no JSON content type, treating body as empty");
            Ok(T::default())
        }
        Err(JsonRejection::JsonDataError(e)) => {
            tracing::debug!(error = %e, "body does not match request shape, treating as empty");
            Ok(T::default())
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to read request body");
            Err(ApiError::Internal)
        }
    }
}

/// Render a handler panic as a generic 500
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");

    ApiError::Internal.into_response()
}
