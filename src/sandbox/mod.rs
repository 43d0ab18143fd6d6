//! Capability sandbox: typed request/response shaping for the five live
//! demo capabilities, plus the per-panel run state machine.

pub mod dispatch;

pub use dispatch::{SandboxDispatcher, SandboxRequest};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendError;

/// One of the five backend interaction shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Chat,
    Workflow,
    Vision,
    Document,
    Analytics,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Chat,
        Capability::Workflow,
        Capability::Vision,
        Capability::Document,
        Capability::Analytics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Capability::Chat => "Chat",
            Capability::Workflow => "Agent Workflow",
            Capability::Vision => "Vision",
            Capability::Document => "Document",
            Capability::Analytics => "Analytics",
        }
    }
}

/// One step of an agentic workflow, in backend execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub step: u32,
    pub action: String,
    #[serde(default)]
    pub result: Option<String>,
}

/// Typed outcome of one sandbox run. Transient: recreated per run,
/// discarded on reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "capability", rename_all = "lowercase")]
pub enum SandboxResult {
    Chat {
        reply: String,
    },
    Workflow {
        steps: Vec<WorkflowStep>,
    },
    Vision {
        description: String,
        objects: Vec<String>,
        insights: Vec<String>,
    },
    Document {
        fields: IndexMap<String, String>,
        confidence: f32,
    },
    Analytics {
        insights: Vec<String>,
        trends: Vec<String>,
        forecast: String,
        recommendation: String,
    },
}

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("image is {actual} bytes, over the {max_bytes} byte limit")]
    ImageTooLarge { actual: usize, max_bytes: usize },
    #[error("the vision capability requires an image")]
    MissingImage,
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("a run is already in progress")]
    Busy,
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("could not interpret the backend reply: {message}")]
    Shape { message: String },
}

/// User-provided image, validated and encoded before dispatch.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    /// Transport encoding for the backend.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }
}

/// Run state of one sandbox panel: `idle → running → {success, error}`,
/// back to idle via [`SandboxPanel::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Success,
    Error,
}

/// One capability panel. At most one run is in flight; re-entry while
/// running is rejected, which is what lets the UI simply disable the
/// trigger instead of cancelling calls.
#[derive(Debug)]
pub struct SandboxPanel {
    capability: Capability,
    state: RunState,
    result: Option<SandboxResult>,
    error: Option<String>,
}

impl SandboxPanel {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            state: RunState::Idle,
            result: None,
            error: None,
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn result(&self) -> Option<&SandboxResult> {
        self.result.as_ref()
    }

    /// User-facing message of the last failed run, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Enter the running state. A completed panel implicitly discards its
    /// previous outcome; a running panel rejects re-entry.
    pub fn begin_run(&mut self) -> Result<(), SandboxError> {
        if self.state == RunState::Running {
            return Err(SandboxError::Busy);
        }
        self.result = None;
        self.error = None;
        self.state = RunState::Running;
        Ok(())
    }

    /// Land a finished run on the panel.
    pub fn finish(&mut self, outcome: &Result<SandboxResult, SandboxError>) {
        match outcome {
            Ok(result) => {
                self.result = Some(result.clone());
                self.state = RunState::Success;
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.state = RunState::Error;
            }
        }
    }

    /// Back to idle, discarding the transient result.
    pub fn reset(&mut self) {
        self.state = RunState::Idle;
        self.result = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_walks_the_state_machine() {
        let mut panel = SandboxPanel::new(Capability::Chat);
        assert_eq!(panel.state(), RunState::Idle);

        panel.begin_run().unwrap();
        assert!(panel.is_running());
        assert!(matches!(panel.begin_run(), Err(SandboxError::Busy)));

        panel.finish(&Ok(SandboxResult::Chat {
            reply: "hi".to_string(),
        }));
        assert_eq!(panel.state(), RunState::Success);
        assert!(panel.result().is_some());

        // a new run from a completed panel discards the old outcome
        panel.begin_run().unwrap();
        assert!(panel.result().is_none());
        panel.finish(&Err(SandboxError::EmptyPrompt));
        assert_eq!(panel.state(), RunState::Error);
        assert_eq!(panel.error(), Some("prompt must not be empty"));

        panel.reset();
        assert_eq!(panel.state(), RunState::Idle);
        assert!(panel.error().is_none());
    }

    #[test]
    fn image_upload_encodes_to_a_data_url() {
        let upload = ImageUpload::new(vec![0xde, 0xad, 0xbe, 0xef], "image/png");
        assert_eq!(upload.data_url(), "data:image/png;base64,3q2+7w==");
    }
}
