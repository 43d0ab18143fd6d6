//! Generative-AI backend clients.

pub mod http;
pub mod traits;

pub use http::HttpBackend;
pub use traits::{BackendError, BackendPrompt, BackendReply, GenerativeBackend};
