//! Chat completion seam.
//!
//! `ChatBackend` is the boundary between the consultation logic and the
//! hosted language-model provider. The production implementation lives in
//! `sage-interaction`; tests substitute recording stubs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A single, non-streaming chat completion request.
///
/// Serializes to the Chat Completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Failure raised by a [`ChatBackend`].
///
/// Each variant displays exactly its message, so callers that only need a
/// human-readable detail can use `to_string()` regardless of the subtype.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Credential rejected by the provider (401/403)
    #[error("{0}")]
    Authentication(String),

    /// Quota or rate limit hit (429)
    #[error("{0}")]
    RateLimited(String),

    /// Connection could not be established or was interrupted
    #[error("{0}")]
    Network(String),

    /// The request exceeded the configured timeout
    #[error("{0}")]
    Timeout(String),

    /// The provider answered with something we could not read
    #[error("{0}")]
    MalformedResponse(String),

    /// Any other provider-side failure
    #[error("{0}")]
    Other(String),
}

impl ChatError {
    /// Short subtype label for structured logs.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::RateLimited(_) => "rate_limited",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Other(_) => "other",
        }
    }
}

/// External chat-completion client.
///
/// The credential is passed per call so that one backend instance can serve
/// any caller without holding secrets of its own.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Sends the request and returns the generated text verbatim.
    async fn complete(&self, credentials: &str, request: ChatRequest) -> Result<String, ChatError>;
}
