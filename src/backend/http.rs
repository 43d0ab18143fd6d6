use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::backend::traits::{BackendError, BackendPrompt, BackendReply, GenerativeBackend};
use crate::config::BackendConfig;
use crate::deserializers::truncate_chars;

/// Backend client for OpenAI-compatible chat-completions endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    timeout_ms: u64,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let api_key = config.api_key.clone().ok_or(BackendError::MissingKey)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| BackendError::Http(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_ms: config.timeout_ms,
        })
    }

    fn message_content(prompt: &BackendPrompt) -> Value {
        match &prompt.image_data_url {
            None => json!(prompt.text),
            Some(url) => json!([
                {"type": "text", "text": prompt.text},
                {"type": "image_url", "image_url": {"url": url}},
            ]),
        }
    }
}

#[async_trait]
impl GenerativeBackend for HttpBackend {
    async fn complete(&self, prompt: &BackendPrompt) -> Result<BackendReply, BackendError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": Self::message_content(prompt)}],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    BackendError::Http(e.to_string())
                }
            })?;

        // Check response status before parsing
        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(BackendError::Status {
                code: status.as_u16(),
                body: truncate_chars(body_text.trim(), 500),
            });
        }

        let val: Value = resp
            .json()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;
        let text = val
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(BackendError::Empty);
        }

        let model = val
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or(&self.model)
            .to_string();
        tracing::debug!("backend completion: {} chars from {}", text.len(), model);

        Ok(BackendReply { text, model })
    }
}
