//! Configuration model.
//!
//! `SecretConfig` mirrors `~/.config/sage/secret.json`. `ConsultationSettings`
//! is the fully resolved view handed to the service and the HTTP client;
//! resolution itself lives in `sage-infrastructure`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consultation::DEFAULT_MODEL;

/// Default Chat Completions base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default upper bound on a single upstream call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
}

/// OpenAI API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Resolved settings for a consultation session.
///
/// `credentials` stays optional: a missing key is reported per request as
/// `MissingCredentials`, not at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ConsultationSettings {
    pub credentials: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ConsultationSettings {
    fn default() -> Self {
        Self {
            credentials: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Manual Debug so the API key never reaches logs.
impl std::fmt::Debug for ConsultationSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsultationSettings")
            .field(
                "credentials",
                &self.credentials.as_ref().map(|_| "<redacted>"),
            )
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
