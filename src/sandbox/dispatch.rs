//! Routes sandbox requests to the backend and coerces replies into typed
//! [`SandboxResult`] variants.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::backend::{BackendPrompt, GenerativeBackend};
use crate::config::SandboxConfig;
use crate::deserializers::parse_embedded;
use crate::prompts::{self, BusinessContext};
use crate::sandbox::{
    Capability, ImageUpload, SandboxError, SandboxPanel, SandboxResult, WorkflowStep,
};

/// One sandbox run: a capability, the user's prompt, optional business
/// context, and (for vision) the uploaded image.
#[derive(Debug, Clone)]
pub struct SandboxRequest {
    pub capability: Capability,
    pub prompt: String,
    pub context: Option<BusinessContext>,
    pub image: Option<ImageUpload>,
}

impl SandboxRequest {
    pub fn new(capability: Capability, prompt: impl Into<String>) -> Self {
        Self {
            capability,
            prompt: prompt.into(),
            context: None,
            image: None,
        }
    }

    pub fn with_context(mut self, context: BusinessContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

#[derive(Debug, Deserialize)]
struct RawWorkflow {
    steps: Vec<WorkflowStep>,
}

#[derive(Debug, Deserialize)]
struct RawVision {
    description: String,
    #[serde(default)]
    objects: Vec<String>,
    #[serde(default)]
    insights: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    fields: IndexMap<String, String>,
    confidence: f32,
}

#[derive(Debug, Deserialize)]
struct RawAnalytics {
    #[serde(default)]
    insights: Vec<String>,
    #[serde(default)]
    trends: Vec<String>,
    forecast: String,
    recommendation: String,
}

fn shape<T: DeserializeOwned>(text: &str) -> Result<T, SandboxError> {
    parse_embedded(text).map_err(|e| SandboxError::Shape {
        message: e.to_string(),
    })
}

/// Routes `(capability, prompt, context)` tuples to the backend. One
/// dispatcher serves all panels; the single-flight discipline lives in
/// [`SandboxPanel`].
pub struct SandboxDispatcher<B> {
    backend: B,
    config: SandboxConfig,
}

impl<B: GenerativeBackend> SandboxDispatcher<B> {
    pub fn new(backend: B, config: SandboxConfig) -> Self {
        Self { backend, config }
    }

    /// Input validation, applied before anything reaches the backend.
    pub fn validate(&self, request: &SandboxRequest) -> Result<(), SandboxError> {
        if request.capability == Capability::Vision {
            let image = request.image.as_ref().ok_or(SandboxError::MissingImage)?;
            if image.bytes.len() > self.config.max_image_bytes {
                return Err(SandboxError::ImageTooLarge {
                    actual: image.bytes.len(),
                    max_bytes: self.config.max_image_bytes,
                });
            }
        } else if request.prompt.trim().is_empty() {
            return Err(SandboxError::EmptyPrompt);
        }
        Ok(())
    }

    /// Validate and dispatch, returning the typed result.
    pub async fn dispatch(&self, request: &SandboxRequest) -> Result<SandboxResult, SandboxError> {
        self.validate(request)?;
        self.dispatch_unchecked(request).await
    }

    /// Drive a full panel run: enter running, validate, dispatch, land the
    /// outcome on the panel. Rejected inputs never reach the backend.
    pub async fn run(
        &self,
        panel: &mut SandboxPanel,
        request: &SandboxRequest,
    ) -> Result<SandboxResult, SandboxError> {
        panel.begin_run()?;
        let outcome = match self.validate(request) {
            Ok(()) => self.dispatch_unchecked(request).await,
            Err(err) => Err(err),
        };
        panel.finish(&outcome);
        outcome
    }

    async fn dispatch_unchecked(
        &self,
        request: &SandboxRequest,
    ) -> Result<SandboxResult, SandboxError> {
        let ctx = request.context.as_ref();
        match request.capability {
            Capability::Chat => {
                let prompt = BackendPrompt::text(prompts::chat_prompt(&request.prompt, ctx));
                let reply = self.backend.complete(&prompt).await?;
                Ok(SandboxResult::Chat { reply: reply.text })
            }
            Capability::Workflow => {
                let prompt = BackendPrompt::text(prompts::workflow_prompt(&request.prompt, ctx));
                let reply = self.backend.complete(&prompt).await?;
                let raw: RawWorkflow = shape(&reply.text)?;
                let mut steps = raw.steps;
                if steps.len() > self.config.workflow_step_cap {
                    tracing::warn!(
                        "workflow reply had {} steps, truncating to {}",
                        steps.len(),
                        self.config.workflow_step_cap
                    );
                    steps.truncate(self.config.workflow_step_cap);
                }
                Ok(SandboxResult::Workflow { steps })
            }
            Capability::Vision => {
                // validate() guarantees the image is present and sized
                let image = request.image.as_ref().ok_or(SandboxError::MissingImage)?;
                let prompt = BackendPrompt::with_image(
                    prompts::vision_prompt(&request.prompt, ctx),
                    image.data_url(),
                );
                let reply = self.backend.complete(&prompt).await?;
                let raw: RawVision = shape(&reply.text)?;
                Ok(SandboxResult::Vision {
                    description: raw.description,
                    objects: raw.objects,
                    insights: raw.insights,
                })
            }
            Capability::Document => {
                let prompt = BackendPrompt::text(prompts::document_prompt(&request.prompt, ctx));
                let reply = self.backend.complete(&prompt).await?;
                let raw: RawDocument = shape(&reply.text)?;
                Ok(SandboxResult::Document {
                    fields: raw.fields,
                    confidence: raw.confidence.clamp(0.0, 100.0),
                })
            }
            Capability::Analytics => {
                let prompt = BackendPrompt::text(prompts::analytics_prompt(&request.prompt, ctx));
                let reply = self.backend.complete(&prompt).await?;
                let raw: RawAnalytics = shape(&reply.text)?;
                Ok(SandboxResult::Analytics {
                    insights: raw.insights,
                    trends: raw.trends,
                    forecast: raw.forecast,
                    recommendation: raw.recommendation,
                })
            }
        }
    }
}
