//! Assistant chat: the per-session transcript and the completion backend seam.
//!
//! Each user message is sent on its own, with no history, and the reply is
//! appended to the transcript. The backend is a trait so handlers never know
//! whether they are talking to the real completion API or a stub.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;
pub mod handlers;

pub use client::CompletionClient;

pub const GREETING: &str = "Hey! How can I assist you today?";
pub const FAILURE_REPLY: &str = "Oops! Something went wrong. Please try again!";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("completion returned no choices")]
    EmptyReply,
}

/// Anything that can turn one user prompt into one reply.
///
/// Carried in `AppState` as `Option<Arc<dyn CompletionBackend>>`; `None` means
/// chat is not configured.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Transcript
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Sent by the user.
    Outgoing,
    /// Sent by the assistant.
    Incoming,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::new(MessageKind::Incoming, GREETING)],
        }
    }
}

impl ChatTranscript {
    pub fn push(&mut self, kind: MessageKind, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(kind, text));
        &self.messages[self.messages.len() - 1]
    }

    /// Records the outcome of a completion call.
    pub fn record_reply(&mut self, reply: &Result<String, ChatError>) -> &ChatMessage {
        match reply {
            Ok(text) => self.push(MessageKind::Incoming, text.clone()),
            Err(_) => self.push(MessageKind::Error, FAILURE_REPLY),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
