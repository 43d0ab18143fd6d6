use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::BlueprintError;

/// One completed backend exchange: the reply text plus the model that
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendReply {
    pub text: String,
    pub model: String,
}

/// Prompt sent to the backend. Vision prompts carry an encoded image
/// alongside the text.
#[derive(Debug, Clone)]
pub struct BackendPrompt {
    pub text: String,
    pub image_data_url: Option<String>,
}

impl BackendPrompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_data_url: None,
        }
    }

    pub fn with_image(text: impl Into<String>, data_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_data_url: Some(data_url.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("http error: {0}")]
    Http(String),
    #[error("backend returned status {code}: {body}")]
    Status { code: u16, body: String },
    #[error("backend returned an empty reply")]
    Empty,
    #[error("api key not configured")]
    MissingKey,
}

impl From<BackendError> for BlueprintError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Timeout { timeout_ms } => BlueprintError::Timeout {
                operation: "backend completion".to_string(),
                timeout_ms,
            },
            other => BlueprintError::Backend {
                message: other.to_string(),
            },
        }
    }
}

/// The generative-AI collaborator behind both the blueprint generator and
/// the capability sandbox. Implementations must not retry on their own;
/// recovery policy belongs to the callers.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn complete(&self, prompt: &BackendPrompt) -> Result<BackendReply, BackendError>;
}

#[async_trait]
impl<T: GenerativeBackend + ?Sized> GenerativeBackend for std::sync::Arc<T> {
    async fn complete(&self, prompt: &BackendPrompt) -> Result<BackendReply, BackendError> {
        (**self).complete(prompt).await
    }
}
