//! Render orchestration: drive the external diagram engine with an
//! exactly-once fallback retry.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::diagram::normalize::normalize;
use crate::error::{BlueprintError, Result};

/// Error raised by the external rendering engine.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External rendering collaborator: takes a normalized diagram description
/// and a unique identifier, yields vector (SVG) markup.
#[async_trait]
pub trait DiagramEngine: Send + Sync {
    async fn render(&self, id: &str, text: &str) -> std::result::Result<String, EngineError>;
}

#[async_trait]
impl<T: DiagramEngine + ?Sized> DiagramEngine for std::sync::Arc<T> {
    async fn render(&self, id: &str, text: &str) -> std::result::Result<String, EngineError> {
        (**self).render(id, text).await
    }
}

/// A finished render and how it was obtained.
#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    pub svg: String,
    pub via_fallback: bool,
}

/// The two-attempt render machine: primary, then at most one fallback.
enum Attempt {
    Primary,
    Fallback { original: EngineError },
}

/// Drives renders through a [`DiagramEngine`].
///
/// One render is in flight per call; callers re-render from scratch when the
/// input changes (no queueing). On a primary failure exactly one fallback
/// attempt is made with a minimal diagram derived from the original text; if
/// that also fails, the primary attempt's error is surfaced and no further
/// attempt is made.
pub struct DiagramRenderer<E> {
    engine: E,
    id_prefix: String,
}

impl<E: DiagramEngine> DiagramRenderer<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            id_prefix: "blueprint".to_string(),
        }
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub async fn render(&self, raw: &str) -> Result<RenderedDiagram> {
        let text = normalize(raw);
        let id = sanitize_render_id(&format!("{}-{}", self.id_prefix, uuid::Uuid::new_v4()));

        let mut attempt = Attempt::Primary;
        loop {
            match attempt {
                Attempt::Primary => match self.engine.render(&id, &text).await {
                    Ok(svg) => {
                        return Ok(RenderedDiagram {
                            svg,
                            via_fallback: false,
                        });
                    }
                    Err(err) => {
                        tracing::warn!("primary diagram render failed: {}", err);
                        attempt = Attempt::Fallback { original: err };
                    }
                },
                Attempt::Fallback { original } => {
                    let fallback = fallback_diagram(raw);
                    match self
                        .engine
                        .render(&format!("{}-fallback", id), &fallback)
                        .await
                    {
                        Ok(svg) => {
                            return Ok(RenderedDiagram {
                                svg,
                                via_fallback: true,
                            });
                        }
                        Err(second) => {
                            tracing::error!(
                                "fallback diagram render failed as well: {}; reporting the original error",
                                second
                            );
                            return Err(BlueprintError::Render {
                                message: original.message,
                            });
                        }
                    }
                }
            }
        }
    }
}

static BRACKET_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]+)\]").unwrap());

/// Minimal fixed diagram used for the single recovery attempt: one node
/// labeled with the first bracketed label in the original text, or a generic
/// placeholder when none is found.
pub(crate) fn fallback_diagram(raw: &str) -> String {
    let label = BRACKET_LABEL_RE
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .find(|s| !s.is_empty())
        .unwrap_or("AI Solution");
    format!("flowchart TD\n    A[{}]", label)
}

/// Converts an arbitrary string into a conservative SVG `id` token so
/// multiple diagrams can be inlined in the same UI tree without internal-id
/// collisions.
pub fn sanitize_render_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "d-untitled".to_string();
    }

    let mut out = String::with_capacity(raw.len() + 2);
    for ch in raw.chars() {
        let ok = ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':' | '.');
        out.push(if ok { ch } else { '-' });
    }

    let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_ok {
        out.insert_str(0, "d-");
    }

    while out.contains("--") {
        out = out.replace("--", "-");
    }
    let out = out.trim_matches('-');
    if out.is_empty() || out == "d" {
        "d-untitled".to_string()
    } else {
        out.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_uses_first_bracketed_label() {
        let raw = "broken --> [ ] nonsense A[Customer Portal] --> B[Queue]";
        assert_eq!(
            fallback_diagram(raw),
            "flowchart TD\n    A[Customer Portal]"
        );
    }

    #[test]
    fn fallback_without_labels_is_generic() {
        assert_eq!(fallback_diagram("no labels here"), "flowchart TD\n    A[AI Solution]");
    }

    #[test]
    fn blank_bracket_labels_are_skipped_for_generic() {
        // the only bracketed span is whitespace, so the generic label wins
        assert_eq!(fallback_diagram("x[  ]"), "flowchart TD\n    A[AI Solution]");
    }

    #[test]
    fn render_ids_are_conservative_tokens() {
        assert_eq!(sanitize_render_id("  my diagram #1 "), "my-diagram-1");
        assert_eq!(sanitize_render_id("42-things"), "d-42-things");
        assert_eq!(sanitize_render_id("***"), "d-untitled");
        assert_eq!(sanitize_render_id(""), "d-untitled");
    }
}
