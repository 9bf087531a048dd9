use std::path::PathBuf;

use thiserror::Error;

/// Listener error types
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("Response document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Server error: {0}")]
    ServerError(#[from] hyper::Error),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// HTTP status code mapping for listener errors
impl ListenerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ListenerError::DocumentNotFound(_) => 500,
            ListenerError::ConfigError(_) => 500,
            ListenerError::IoError(_) => 500,
            ListenerError::ServerError(_) => 500,
            ListenerError::InternalError(_) => 500,
        }
    }
}

/// Configuration specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}
