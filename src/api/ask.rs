//! Dialogue endpoint

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, ApiState, json_body};
use crate::dialogue::{Orchestrator, Turn, TurnReply};

/// Build dialogue router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .with_state(state)
}

/// Dialogue request
///
/// Fields stay loosely typed so a wrongly typed value degrades the turn
/// instead of rejecting the request.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub conversation_history: Option<Value>,
}

/// Handle one dialogue turn
///
/// Upstream chat failures still answer 200 with a fallback prompt, as do
/// messages or histories that cannot be read.
async fn ask(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<TurnReply>, ApiError> {
    let request = json_body(payload)?;

    let history = match request.conversation_history {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value::<Vec<Turn>>(value),
    };

    let message = match request.message {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => {
            tracing::warn!(
                kind = value_kind(&other),
                "message is not text, using fallback prompt"
            );
            let turn_count = history.as_ref().map_or(1, |h| h.len() + 1);
            return Ok(Json(Orchestrator::fallback_reply(turn_count)));
        }
    };

    // An empty message is rejected by the orchestrator whatever the history holds
    let history = match history {
        Ok(history) => history,
        Err(e) if !message.is_empty() => {
            tracing::warn!(
                error = %e,
                "unreadable conversation history, using fallback prompt"
            );
            return Ok(Json(Orchestrator::fallback_reply(1)));
        }
        Err(_) => Vec::new(),
    };

    let reply = state.orchestrator.handle_turn(&message, &history).await?;

    tracing::info!(
        intent = %reply.intent,
        turn_count = reply.turn_count,
        "turn handled"
    );

    Ok(Json(reply))
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
