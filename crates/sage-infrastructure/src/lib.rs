pub mod paths;
pub mod settings;
pub mod storage;

pub use crate::paths::SagePaths;
pub use crate::settings::{SettingsOverrides, SettingsResolver};
pub use crate::storage::{SecretStorage, SecretStorageError};
