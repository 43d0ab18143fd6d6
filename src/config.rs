use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BlueprintError, Result};

/// Number of solutions the blueprint schema demands. The prompt, the
/// validator, and the placeholder all agree on this value.
pub const SOLUTION_COUNT: usize = 4;

const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Main configuration structure loaded from ai_blueprint.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub generator: GeneratorConfig,
    pub sandbox: SandboxConfig,
}

/// Generative-AI backend endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Never read from the config file; environment only.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 30_000,
            temperature: 0.7,
            max_tokens: 1024,
            api_key: None,
        }
    }
}

/// Blueprint generation knobs
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Fixed by the blueprint schema; validated against [`SOLUTION_COUNT`].
    pub solution_count: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            solution_count: SOLUTION_COUNT,
        }
    }
}

/// Capability sandbox limits
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub max_image_bytes: usize,
    pub workflow_step_cap: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            workflow_step_cap: 12,
        }
    }
}

impl Config {
    /// Load configuration: optional TOML file, then environment overrides.
    ///
    /// The file is resolved from `AI_BLUEPRINT_CONFIG`, then
    /// `./ai_blueprint.toml`; a missing file just means defaults.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => {
                let raw = std::fs::read_to_string(&path).map_err(|e| BlueprintError::Config {
                    message: format!("failed to read {}: {}", path.display(), e),
                })?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var("AI_BLUEPRINT_CONFIG") {
            return Some(PathBuf::from(explicit));
        }
        let cwd = PathBuf::from("ai_blueprint.toml");
        cwd.exists().then_some(cwd)
    }

    /// Environment overrides. Unparseable numbers are ignored, out-of-range
    /// values are clamped.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("AI_BLUEPRINT_BASE_URL")
            && !url.trim().is_empty()
        {
            self.backend.base_url = url;
        }
        if let Ok(model) = std::env::var("AI_BLUEPRINT_MODEL")
            && !model.trim().is_empty()
        {
            self.backend.model = model;
        }
        if let Some(timeout) = std::env::var("AI_BLUEPRINT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.backend.timeout_ms = timeout.clamp(1_000, 300_000);
        }
        if let Some(temp) = std::env::var("AI_BLUEPRINT_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
        {
            self.backend.temperature = temp.clamp(0.0, 2.0);
        }
        if let Some(max_tokens) = std::env::var("AI_BLUEPRINT_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            self.backend.max_tokens = max_tokens.clamp(64, 16_384);
        }
        if let Some(max_bytes) = std::env::var("AI_BLUEPRINT_MAX_IMAGE_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.sandbox.max_image_bytes = max_bytes.clamp(1024, 32 * 1024 * 1024);
        }
        if let Some(cap) = std::env::var("AI_BLUEPRINT_WORKFLOW_STEP_CAP")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.sandbox.workflow_step_cap = cap.clamp(1, 64);
        }

        self.backend.api_key = std::env::var("AI_BLUEPRINT_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());
    }

    fn validate(&self) -> Result<()> {
        if self.generator.solution_count != SOLUTION_COUNT {
            return Err(BlueprintError::Config {
                message: format!(
                    "generator.solution_count must be {} (the blueprint schema is fixed), got {}",
                    SOLUTION_COUNT, self.generator.solution_count
                ),
            });
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(BlueprintError::Config {
                message: "backend.base_url must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
