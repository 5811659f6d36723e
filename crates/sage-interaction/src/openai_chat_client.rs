//! OpenAIChatClient - Direct REST client for the OpenAI Chat Completions API.
//!
//! Holds no credentials: the bearer token is supplied per request by the
//! consultation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sage_core::chat::{ChatBackend, ChatError, ChatRequest};
use sage_core::config::ConsultationSettings;
use sage_core::error::{Result, SageError};
use serde::Deserialize;

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Chat backend that talks to the OpenAI HTTP API (or a compatible server).
#[derive(Clone)]
pub struct OpenAIChatClient {
    client: Client,
    endpoint: String,
}

impl OpenAIChatClient {
    /// Creates a client for `base_url` (e.g. `https://api.openai.com/v1`)
    /// whose requests are abandoned after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SageError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), COMPLETIONS_PATH),
        })
    }

    pub fn from_settings(settings: &ConsultationSettings) -> Result<Self> {
        Self::new(&settings.base_url, settings.timeout)
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for OpenAIChatClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        credentials: &str,
        request: ChatRequest,
    ) -> std::result::Result<String, ChatError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credentials)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|err| {
            ChatError::MalformedResponse(format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(
    response: ChatCompletionResponse,
) -> std::result::Result<String, ChatError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            ChatError::MalformedResponse("OpenAI API returned no content in the response".into())
        })
}

fn map_transport_error(err: reqwest::Error) -> ChatError {
    if err.is_timeout() {
        ChatError::Timeout(format!("OpenAI API request timed out: {err}"))
    } else {
        ChatError::Network(format!("OpenAI API request failed: {err}"))
    }
}

fn map_http_error(status: StatusCode, body: &str) -> ChatError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                format!("OpenAI API returned HTTP {status}")
            } else {
                body.to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimited(message),
        _ => ChatError::Other(message),
    }
}
