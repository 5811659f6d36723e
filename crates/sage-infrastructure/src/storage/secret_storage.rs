//! Secret configuration file storage.
//!
//! Loads the API key and model settings from `~/.config/sage/secret.json`.

use crate::paths::SagePaths;
use sage_core::SageError;
use sage_core::config::SecretConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Configuration file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

impl From<SecretStorageError> for SageError {
    fn from(err: SecretStorageError) -> Self {
        match err {
            SecretStorageError::NotFound(path) => {
                SageError::not_found("secret file", path.display().to_string())
            }
            SecretStorageError::IoError(e) => e.into(),
            SecretStorageError::ParseError(e) => SageError::Serialization {
                format: "JSON".to_string(),
                message: e.to_string(),
            },
            SecretStorageError::ConfigDirNotFound => {
                SageError::config("Could not determine home directory")
            }
        }
    }
}

/// Read-only storage for `secret.json`.
///
/// The file is plaintext JSON and should be readable only by its owner
/// (e.g. mode 600).
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a new SecretStorage with the default path (~/.config/sage/secret.json).
    pub fn new() -> Result<Self, SecretStorageError> {
        let path = SagePaths::secret_file().map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(SecretStorageError::NotFound)`: File doesn't exist
    /// - `Err(SecretStorageError::IoError)`: Failed to read file
    /// - `Err(SecretStorageError::ParseError)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Like [`SecretStorage::load`], but a missing file is `Ok(None)`.
    pub fn load_optional(&self) -> Result<Option<SecretConfig>, SecretStorageError> {
        match self.load() {
            Ok(config) => Ok(Some(config)),
            Err(SecretStorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns the path to the secret file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
