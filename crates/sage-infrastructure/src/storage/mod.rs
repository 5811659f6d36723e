//! Storage layer for configuration files.

mod secret_storage;

pub use secret_storage::{SecretStorage, SecretStorageError};
