pub mod chat;
pub mod config;
pub mod consultation;
pub mod error;
pub mod persona;

// Re-export common error type
pub use error::SageError;
