//! Locating a JSON object inside a free-form model response.
//!
//! Models wrap structured answers in markdown fences, precede them with
//! reasoning, or echo the `output: ` label from the prompt. Extraction tries,
//! in order:
//! 1. A fenced code block (```json or bare ```) holding a valid object
//! 2. The response itself when it starts with `{`
//! 3. The largest valid object anywhere, later occurrences winning ties
//!
//! When none parses but an object was opened and never closed, the response
//! is reported as truncated.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static FENCED_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"```(?:[A-Za-z]+)?\s*\n?([\s\S]*?)\n?```").ok());

/// Outcome of searching a response for a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonExtraction {
    /// A parsed object and the text it was parsed from.
    Found { json: String, value: Value },
    /// An object was opened but never closed.
    Truncated {
        partial: String,
        unclosed_braces: usize,
        unclosed_brackets: usize,
    },
    NotFound,
}

impl JsonExtraction {
    pub fn is_found(&self) -> bool {
        matches!(self, JsonExtraction::Found { .. })
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, JsonExtraction::Truncated { .. })
    }

    /// Human-readable reason for a failed extraction.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            JsonExtraction::Found { .. } => None,
            JsonExtraction::Truncated {
                unclosed_braces,
                unclosed_brackets,
                ..
            } => Some(format!(
                "JSON appears truncated: {} unclosed braces, {} unclosed brackets",
                unclosed_braces, unclosed_brackets
            )),
            JsonExtraction::NotFound => Some("no JSON object found in response".to_string()),
        }
    }
}

/// Nesting state at the end of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestingState {
    pub unclosed_braces: usize,
    pub unclosed_brackets: usize,
    pub in_string: bool,
}

impl NestingState {
    pub fn is_balanced(&self) -> bool {
        self.unclosed_braces == 0 && self.unclosed_brackets == 0 && !self.in_string
    }
}

/// Scans `s` tracking brace and bracket depth outside string literals.
pub fn nesting_state(s: &str) -> NestingState {
    let mut braces: isize = 0;
    let mut brackets: isize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for c in s.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => braces += 1,
            '}' if !in_string => braces -= 1,
            '[' if !in_string => brackets += 1,
            ']' if !in_string => brackets -= 1,
            _ => {}
        }
    }

    NestingState {
        unclosed_braces: braces.max(0) as usize,
        unclosed_brackets: brackets.max(0) as usize,
        in_string,
    }
}

/// Index of the `}` closing the object that `s` starts with.
///
/// Braces inside string literals, including escaped quotes, are ignored.
pub fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses the object starting at the beginning of `s`, if it is valid JSON.
fn object_at_start(s: &str) -> Option<(String, Value)> {
    let end = find_matching_brace(s)?;
    let candidate = &s[..=end];
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) if value.is_object() => Some((candidate.to_string(), value)),
        _ => None,
    }
}

/// Object held in the first fenced code block that contains one.
pub fn extract_from_code_block(content: &str) -> Option<(String, Value)> {
    let regex = FENCED_BLOCK.as_ref()?;
    regex.captures_iter(content).find_map(|caps| {
        let block = caps.get(1)?.as_str().trim();
        let start = block.find('{')?;
        object_at_start(&block[start..])
    })
}

/// Byte spans of every balanced `{`...`}` pair in `content`, found in one
/// pass. Braces inside string literals are ignored; string tracking only runs
/// while some object is open, so quotes in surrounding prose don't count.
fn balanced_spans(content: &str) -> Vec<(usize, usize)> {
    let mut open: Vec<usize> = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in content.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' if !open.is_empty() => in_string = !in_string,
            '{' if !in_string => open.push(i),
            '}' if !in_string => {
                if let Some(start) = open.pop() {
                    spans.push((start, i));
                }
            }
            _ => {}
        }
    }

    spans
}

/// Largest valid object in `content`; among equal sizes the last one wins.
pub fn extract_largest_object(content: &str) -> Option<(String, Value)> {
    let mut spans = balanced_spans(content);
    spans.sort_by(|(start_a, end_a), (start_b, end_b)| {
        (end_b - start_b)
            .cmp(&(end_a - start_a))
            .then(start_b.cmp(start_a))
    });

    spans.into_iter().find_map(|(start, end)| {
        let candidate = &content[start..=end];
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) if value.is_object() => Some((candidate.to_string(), value)),
            _ => None,
        }
    })
}

/// Searches `content` for a JSON object.
pub fn extract_json_object(content: &str) -> JsonExtraction {
    let trimmed = content.trim();

    let found = extract_from_code_block(trimmed)
        .or_else(|| {
            if trimmed.starts_with('{') {
                object_at_start(trimmed)
            } else {
                None
            }
        })
        .or_else(|| extract_largest_object(trimmed));

    if let Some((json, value)) = found {
        return JsonExtraction::Found { json, value };
    }

    if let Some(start) = trimmed.find('{') {
        let partial = &trimmed[start..];
        let state = nesting_state(partial);
        if !state.is_balanced() {
            return JsonExtraction::Truncated {
                partial: partial.to_string(),
                unclosed_braces: state.unclosed_braces,
                unclosed_brackets: state.unclosed_brackets,
            };
        }
    }

    JsonExtraction::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn found_value(content: &str) -> Value {
        match extract_json_object(content) {
            JsonExtraction::Found { value, .. } => value,
            other => panic!("expected an object, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_object() {
        assert_eq!(
            found_value(r#"{"verdict": 1, "feedback": "Clara."}"#),
            json!({"verdict": 1, "feedback": "Clara."})
        );
    }

    #[test]
    fn test_json_code_block() {
        let content = "Aquí está:\n```json\n{\"clarity\": 3}\n```\nListo.";
        assert_eq!(found_value(content), json!({"clarity": 3}));
    }

    #[test]
    fn test_generic_code_block() {
        let content = "```\n{\"topics\": [\"a\", \"b\"]}\n```";
        assert_eq!(found_value(content), json!({"topics": ["a", "b"]}));
    }

    #[test]
    fn test_inline_fence_as_rendered_in_examples() {
        let content = "```{\"keyphrases\":[\"Agujero negro\"]}```";
        assert_eq!(found_value(content), json!({"keyphrases": ["Agujero negro"]}));
    }

    #[test]
    fn test_object_after_output_label() {
        let content = r#"output: {"reason": "Iguales.", "verdict": 1}"#;
        assert_eq!(found_value(content), json!({"reason": "Iguales.", "verdict": 1}));
    }

    #[test]
    fn test_prefers_largest_object_after_reasoning() {
        let content = r#"Pienso en {"a": 1} primero.
Respuesta final: {"answer": "París", "verdict": "1"}"#;
        assert_eq!(found_value(content), json!({"answer": "París", "verdict": "1"}));
    }

    #[test]
    fn test_equal_sizes_prefer_later() {
        let (json, _) = extract_largest_object(r#"{"a": 1} y {"b": 2}"#).unwrap();
        assert_eq!(json, r#"{"b": 2}"#);
    }

    #[test]
    fn test_braces_inside_strings() {
        let content = r#"{"feedback": "usa { y } con cuidado", "verdict": 0}"#;
        assert_eq!(found_value(content)["verdict"], json!(0));
        assert_eq!(find_matching_brace(content), Some(content.len() - 1));
    }

    #[test]
    fn test_escaped_quotes() {
        let content = r#"{"reason": "dijo \"hola\"", "verdict": 1}"#;
        assert_eq!(found_value(content)["reason"], json!("dijo \"hola\""));
    }

    #[test]
    fn test_truncated_object() {
        let result = extract_json_object(r#"{"feedback": "La pregunta es"#);
        assert!(result.is_truncated());
        match result {
            JsonExtraction::Truncated {
                unclosed_braces, ..
            } => assert_eq!(unclosed_braces, 1),
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_nested() {
        let result = extract_json_object(r#"Resultado: {"topics": ["uno", "dos"#);
        match result {
            JsonExtraction::Truncated {
                partial,
                unclosed_braces,
                unclosed_brackets,
            } => {
                assert!(partial.starts_with('{'));
                assert_eq!(unclosed_braces, 1);
                assert_eq!(unclosed_brackets, 1);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found() {
        assert_eq!(extract_json_object("sin datos"), JsonExtraction::NotFound);
        assert_eq!(extract_json_object("   "), JsonExtraction::NotFound);
        assert!(JsonExtraction::NotFound.failure_reason().is_some());
    }

    #[test]
    fn test_arrays_are_not_objects() {
        assert_eq!(extract_json_object("[1, 2, 3]"), JsonExtraction::NotFound);
    }

    #[test]
    fn test_unclosed_braces_scan_is_linear() {
        let content = "{".repeat(50_000);
        let started = std::time::Instant::now();
        let result = extract_json_object(&content);
        assert!(result.is_truncated());
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn test_many_candidates_after_prose() {
        let mut content = "{ nota: sin cerrar ".repeat(10_000);
        content.push_str(r#"{"verdict": 1, "feedback": "Clara."}"#);
        let (_, value) = extract_largest_object(&content).unwrap();
        assert_eq!(value, json!({"verdict": 1, "feedback": "Clara."}));
    }

    #[test]
    fn test_inner_object_of_unclosed_outer() {
        let (json, _) = extract_largest_object(r#"{"a": {"b": 1}"#).unwrap();
        assert_eq!(json, r#"{"b": 1}"#);
    }

    #[test]
    fn test_quote_in_prose_before_object() {
        let content = r#"El modelo dijo "ok y luego {"verdict": 0, "reason": "x"}"#;
        assert_eq!(found_value(content)["verdict"], json!(0));
    }

    #[test]
    fn test_unbalanced_closing_brace() {
        assert_eq!(find_matching_brace("}{"), None);
    }

    #[test]
    fn test_nesting_state() {
        let state = nesting_state(r#"{"a": "b"}"#);
        assert!(state.is_balanced());

        let state = nesting_state(r#"{"a": "b"#);
        assert_eq!(state.unclosed_braces, 1);
        assert!(state.in_string);
    }
}
