//! Engine behind a generative-AI "blueprint" experience: a company name goes
//! in, one backend call returns a structured business analysis plus a
//! diagram description, and the same backend powers a five-capability live
//! sandbox (chat, agent workflow, vision, document extraction, analytics).
//!
//! The crate owns the orchestration — prompt templates, defensive parsing
//! with placeholder fallback, diagram normalization and render recovery,
//! per-panel run gating, and the shared application state — and treats the
//! generative backend and the diagram rendering engine as untrusted external
//! collaborators behind traits.

pub mod backend;
pub mod blueprint;
pub mod config;
pub mod deserializers;
pub mod diagram;
pub mod error;
pub mod prompts;
pub mod sandbox;
pub mod state;

pub use backend::{BackendError, BackendPrompt, BackendReply, GenerativeBackend, HttpBackend};
pub use blueprint::{
    BlueprintGenerator, BlueprintSource, CompanyData, Solution, SolutionKind,
    placeholder_blueprint,
};
pub use config::{Config, SOLUTION_COUNT};
pub use diagram::{DiagramEngine, DiagramRenderer, EngineError, RenderedDiagram, normalize};
pub use error::{BlueprintError, Result};
pub use prompts::{BusinessContext, suggested_prompts};
pub use sandbox::{
    Capability, ImageUpload, RunState, SandboxDispatcher, SandboxError, SandboxPanel,
    SandboxRequest, SandboxResult, WorkflowStep,
};
pub use state::{AppStore, BlueprintWriter, PageSection, ScrollWriter, StoreSnapshot};

// Load env from a simple, standardized location resolution.
// This uses dotenvy::dotenv().ok() which loads .env if present and silently ignores if missing.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}

/// Initialize tracing from `RUST_LOG`; safe to call more than once.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
