//! Path management for sage configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/sage/              # Config directory
//! └── secret.json              # API key and model settings
//! ```

use std::path::PathBuf;

const APP_NAME: &str = "sage";
const SECRET_FILE: &str = "secret.json";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for sage.
pub struct SagePaths;

impl SagePaths {
    /// Returns the sage configuration directory (`~/.config/sage/`).
    ///
    /// The `.config` location is used on every platform so that the path in
    /// user-facing messages is the same everywhere.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join(APP_NAME))
    }

    /// Returns the path to `secret.json`.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(SECRET_FILE))
    }
}
