//! Defensive deserialization of model replies.
//!
//! Generative backends promise JSON but deliver prose, fences, and preambles.
//! The helpers here pull balanced JSON objects out of arbitrary reply text so
//! callers can try candidates instead of trusting the whole string.

use serde::de::DeserializeOwned;

use crate::error::{BlueprintError, Result};

/// Deserialize a `T` embedded somewhere in free-form reply text.
///
/// Tries the whole (trimmed) reply first, then every balanced JSON object
/// found in it, newest candidate first.
pub fn parse_embedded<T: DeserializeOwned>(text: &str) -> Result<T> {
    if let Ok(value) = serde_json::from_str::<T>(text.trim()) {
        return Ok(value);
    }

    let candidates = extract_json_candidates(text);
    for candidate in candidates.iter().rev() {
        if let Ok(value) = serde_json::from_str::<T>(candidate) {
            return Ok(value);
        }
    }

    let snippet = truncate_chars(text.trim(), 300);
    Err(BlueprintError::Parse {
        message: format!("no usable JSON payload found in reply: {}", snippet),
    })
}

/// Collect every top-level balanced `{...}` span, string- and escape-aware.
pub fn extract_json_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut depth: u32 = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match ch {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0
                        && let Some(s) = start.take()
                    {
                        candidates.push(text[s..idx + 1].to_string());
                    }
                }
            }
            _ => {}
        }
    }

    candidates
}

pub fn truncate_chars(input: &str, max: usize) -> String {
    let mut out = String::new();
    for (idx, ch) in input.chars().enumerate() {
        if idx >= max {
            out.push_str("...");
            break;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        name: String,
    }

    #[test]
    fn parses_bare_json() {
        let probe: Probe = parse_embedded(r#"{"name":"direct"}"#).unwrap();
        assert_eq!(probe.name, "direct");
    }

    #[test]
    fn parses_json_wrapped_in_prose_and_fences() {
        let reply = "Sure! Here is the analysis you asked for:\n```json\n{\"name\":\"fenced\"}\n```\nLet me know if you need more.";
        let probe: Probe = parse_embedded(reply).unwrap();
        assert_eq!(probe.name, "fenced");
    }

    #[test]
    fn braces_inside_strings_do_not_break_the_scan() {
        let reply = r#"prefix {"name":"a{b}c"} suffix"#;
        let probe: Probe = parse_embedded(reply).unwrap();
        assert_eq!(probe.name, "a{b}c");
    }

    #[test]
    fn last_candidate_wins_when_several_parse() {
        let reply = r#"{"name":"first"} and then {"name":"second"}"#;
        let probe: Probe = parse_embedded(reply).unwrap();
        assert_eq!(probe.name, "second");
    }

    #[test]
    fn no_json_is_a_parse_error() {
        let err = parse_embedded::<Probe>("nothing structured here").unwrap_err();
        assert!(err.to_string().contains("Parse error"));
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("ab", 3), "ab");
    }
}
