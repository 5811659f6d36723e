//! Consultation request/result model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chat::ChatError;

/// Chat model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for every dispatch.
pub const TEMPERATURE: f64 = 0.6;

/// Upper bound on generated tokens for every dispatch.
pub const MAX_OUTPUT_TOKENS: u32 = 1500;

/// What the user asked, and whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub persona_key: String,
    pub query_text: String,
}

impl ConsultationRequest {
    pub fn new(persona_key: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            persona_key: persona_key.into(),
            query_text: query_text.into(),
        }
    }

    /// True when the query is blank after trimming and must not be dispatched.
    pub fn is_blank(&self) -> bool {
        self.query_text.trim().is_empty()
    }
}

/// Why a consultation produced no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCredentials,
    UnknownPersona,
    EmptyQuery,
    UpstreamError,
}

impl ErrorKind {
    /// Message shown to the user in place of an answer.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => concat!(
                "OPENAI_API_KEY is not set. ",
                "Add it to ~/.config/sage/secret.json, the environment, or a .env file."
            ),
            Self::UnknownPersona => "An invalid expert was selected.",
            Self::EmptyQuery => "Please enter a question.",
            Self::UpstreamError => "An error occurred",
        }
    }
}

/// Outcome of one consultation. Produced once, never retried or cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsultationResult {
    Success { text: String },
    Failure { kind: ErrorKind, detail: String },
}

impl ConsultationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Generated text, if the consultation succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Failure kind, if the consultation failed.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// The single conversion point from backend failures.
impl From<ChatError> for ConsultationResult {
    fn from(err: ChatError) -> Self {
        Self::failure(ErrorKind::UpstreamError, err.to_string())
    }
}

impl fmt::Display for ConsultationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { text } => f.write_str(text),
            Self::Failure {
                kind: ErrorKind::UpstreamError,
                detail,
            } => write!(f, "{}: {}", ErrorKind::UpstreamError.user_message(), detail),
            Self::Failure { kind, .. } => f.write_str(kind.user_message()),
        }
    }
}
