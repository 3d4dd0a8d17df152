use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::auth::CurrentSession;
use crate::chat::{ChatMessage, MessageKind};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// GET /api/v1/chat
pub async fn handle_transcript(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = state
        .sessions
        .with_session(session.token, |s| s.chat.messages().to_vec())
        .await
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(messages))
}

/// POST /api/v1/chat
///
/// Records the message, asks the backend, and records its reply. On failure
/// the transcript gets an error entry and the caller gets 502.
pub async fn handle_send(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let prompt = req.message.trim().to_string();
    if prompt.is_empty() {
        return Err(AppError::Validation("Message must not be empty".into()));
    }
    let backend = state.chat.clone().ok_or(AppError::ChatUnavailable)?;

    state
        .sessions
        .with_session(session.token, |s| {
            s.chat.push(MessageKind::Outgoing, prompt.clone());
        })
        .await
        .ok_or(AppError::Unauthorized)?;

    let reply = backend.complete(&prompt).await;
    debug!(user = %session.user.email, ok = reply.is_ok(), "chat completion finished");

    let recorded = state
        .sessions
        .with_session(session.token, |s| s.chat.record_reply(&reply).clone())
        .await
        .ok_or(AppError::Unauthorized)?;

    match reply {
        Ok(_) => Ok(Json(recorded)),
        Err(e) => Err(AppError::Chat(e)),
    }
}
