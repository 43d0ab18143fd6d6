//! Domain-specific error types for ai-blueprint

use thiserror::Error;

/// Main error type for the blueprint engine
#[derive(Error, Debug)]
pub enum BlueprintError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for BlueprintError {
    fn from(err: anyhow::Error) -> Self {
        BlueprintError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BlueprintError {
    fn from(err: serde_json::Error) -> Self {
        BlueprintError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BlueprintError {
    fn from(err: reqwest::Error) -> Self {
        BlueprintError::Backend {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

impl From<toml::de::Error> for BlueprintError {
    fn from(err: toml::de::Error) -> Self {
        BlueprintError::Config {
            message: err.to_string(),
        }
    }
}

/// Result type alias for blueprint operations
pub type Result<T> = std::result::Result<T, BlueprintError>;
