//! Resolution of [`ConsultationSettings`] from files, environment and flags.
//!
//! Priority, highest first:
//! 1. explicit overrides (CLI flags)
//! 2. `~/.config/sage/secret.json`
//! 3. environment variables (`OPENAI_API_KEY`, `OPENAI_MODEL_NAME`,
//!    `OPENAI_BASE_URL`, `SAGE_TIMEOUT_SECS`)
//! 4. built-in defaults
//!
//! The API key cannot be overridden by a flag so it never shows up in shell
//! history.

use std::path::PathBuf;
use std::time::Duration;

use sage_core::config::{
    ConsultationSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, OpenAIConfig,
};
use sage_core::consultation::DEFAULT_MODEL;
use sage_core::error::{Result, SageError};

use crate::storage::SecretStorage;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "OPENAI_MODEL_NAME";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "SAGE_TIMEOUT_SECS";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Loads a `.env` file from the working directory (or a parent) into the
/// process environment. Variables that are already set win.
///
/// Returns the path of the loaded file, or `None` when there is no file.
/// Runs before logging is set up, so nothing is logged here.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(SageError::Serialization {
            format: "dotenv".to_string(),
            message: e.to_string(),
        }),
    }
}

/// Builds [`ConsultationSettings`] from the configured sources.
pub struct SettingsResolver {
    storage: Option<SecretStorage>,
    env: EnvLookup,
}

impl SettingsResolver {
    /// Uses `~/.config/sage/secret.json` (when a home directory exists) and
    /// the process environment.
    pub fn new() -> Self {
        let storage = match SecretStorage::new() {
            Ok(storage) => Some(storage),
            Err(e) => {
                tracing::debug!("Secret storage unavailable: {}", e);
                None
            }
        };

        Self {
            storage,
            env: Box::new(|name: &str| std::env::var(name).ok()),
        }
    }

    /// Reads secrets from `storage` instead of the default location.
    pub fn with_storage(mut self, storage: SecretStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replaces the environment lookup (for testing).
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(env);
        self
    }

    pub fn resolve(&self, overrides: &SettingsOverrides) -> Result<ConsultationSettings> {
        let openai = self.load_openai_config()?;

        let credentials = openai
            .as_ref()
            .map(|config| config.api_key.clone())
            .and_then(non_blank)
            .or_else(|| self.env_var(ENV_API_KEY));

        let model = overrides
            .model
            .clone()
            .and_then(non_blank)
            .or_else(|| openai.as_ref().and_then(|c| c.model_name.clone()).and_then(non_blank))
            .or_else(|| self.env_var(ENV_MODEL))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = overrides
            .base_url
            .clone()
            .and_then(non_blank)
            .or_else(|| openai.as_ref().and_then(|c| c.base_url.clone()).and_then(non_blank))
            .or_else(|| self.env_var(ENV_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match overrides
            .timeout_secs
            .or_else(|| openai.as_ref().and_then(|c| c.timeout_secs))
        {
            Some(secs) => secs,
            None => match self.env_var(ENV_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    SageError::config(format!(
                        "{ENV_TIMEOUT_SECS} must be a number of seconds, got '{raw}'"
                    ))
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        if timeout_secs == 0 {
            return Err(SageError::config("timeout must be at least one second"));
        }

        let settings = ConsultationSettings {
            credentials,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        };
        tracing::debug!("Resolved settings: {:?}", settings);

        Ok(settings)
    }

    fn load_openai_config(&self) -> Result<Option<OpenAIConfig>> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };

        let config = storage.load_optional()?;
        if config.is_some() {
            tracing::debug!("Using secret file {}", storage.path().display());
        }
        Ok(config.and_then(|c| c.openai))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        (self.env)(name).and_then(non_blank)
    }
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
