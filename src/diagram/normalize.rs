//! Repairs raw diagram descriptions into renderable form.
//!
//! Model-produced diagram text arrives wrapped in code fences, with escaped
//! newlines, or missing its kind declaration. `normalize` is a pure function:
//! same input, same output, no I/O.

use once_cell::sync::Lazy;
use regex::Regex;

/// First tokens the rendering engine recognizes as a diagram kind
/// declaration. `flowchart`/`graph` are two spellings of the same kind, as
/// are the two `stateDiagram` variants.
pub const RECOGNIZED_HEADS: &[&str] = &[
    "flowchart",
    "graph",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "mindmap",
];

/// Declaration prepended when the text does not start with a recognized head.
pub const DEFAULT_DECLARATION: &str = "flowchart TD";

// A fence marker line: optional indent, three-plus backticks, optional
// language tag. Matched per line so inline backticks in labels survive.
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*`{3,}[A-Za-z0-9_-]*[ \t]*$").unwrap());

/// Normalize a raw diagram description.
///
/// Strips code-fence markers, unescapes literal newline sequences, trims,
/// and guarantees the result starts with a recognized diagram-kind token.
/// Idempotent: normalizing twice equals normalizing once.
pub fn normalize(raw: &str) -> String {
    // Unescape before fence stripping so a fence glued to the content by a
    // literal "\n" still lands on its own line.
    let unescaped = raw
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace('\r', "");
    let without_fences = FENCE_RE.replace_all(&unescaped, "");
    let trimmed = without_fences.trim();

    if trimmed.is_empty() {
        return DEFAULT_DECLARATION.to_string();
    }
    if has_recognized_head(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}\n{}", DEFAULT_DECLARATION, trimmed)
    }
}

/// Whether the text already begins with a recognized diagram-kind token.
pub fn has_recognized_head(text: &str) -> bool {
    let first = text
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_end_matches(';');
    RECOGNIZED_HEADS.contains(&first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_unescapes_newlines() {
        let raw = "```mermaid\nflowchart TD\\nA[Input] --> B[Model]\n```";
        let out = normalize(raw);
        assert!(!out.contains("```"));
        assert!(!out.contains("\\n"));
        assert_eq!(out, "flowchart TD\nA[Input] --> B[Model]");
    }

    #[test]
    fn well_formed_text_passes_through() {
        let raw = "flowchart TD\nA-->B";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn unrecognized_head_gets_default_declaration() {
        let out = normalize("A[Start] --> B[End]");
        assert!(out.starts_with("flowchart TD\n"));
        assert!(out.ends_with("A[Start] --> B[End]"));
    }

    #[test]
    fn every_recognized_head_is_accepted() {
        for head in RECOGNIZED_HEADS {
            let text = format!("{} X\ndetail", head);
            assert!(
                normalize(&text).starts_with(head),
                "{} should be recognized",
                head
            );
        }
    }

    #[test]
    fn head_with_trailing_semicolon_is_recognized() {
        assert_eq!(normalize("graph TD;\nA-->B"), "graph TD;\nA-->B");
    }

    #[test]
    fn empty_input_becomes_bare_declaration() {
        assert_eq!(normalize("   \n  "), DEFAULT_DECLARATION);
        assert_eq!(normalize("```\n```"), DEFAULT_DECLARATION);
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let inputs = [
            "```mermaid\\nsequenceDiagram\\nAlice->>Bob: hi\\n```",
            "nodes only [Here]",
            "pie\n\"a\": 1",
            "",
            "graph LR\r\nA --> B",
        ];
        for raw in inputs {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn windows_escapes_are_unescaped() {
        let out = normalize("flowchart TD\\r\\nA-->B");
        assert_eq!(out, "flowchart TD\nA-->B");
    }
}
