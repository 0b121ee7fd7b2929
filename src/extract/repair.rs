//! JSON recovery from raw model output.
//!
//! Models that cannot do schema-guided decoding return free text with a JSON
//! object buried somewhere inside it. This module digs the object out using a
//! priority list of candidate extractors, each tried in order:
//!
//! 1. the entire trimmed output, if it is brace-delimited top to bottom
//! 2. content following a `</think>` reasoning delimiter
//! 3. content inside a ```json fenced code block
//! 4. the first brace-delimited substring found anywhere
//!
//! Before a candidate is rejected it gets one repair pass that escapes
//! unescaped literal newlines inside string values, a common cause of
//! otherwise-valid JSON failing to parse. The first candidate that parses to
//! an object wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

static THINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)</think>\s*(\{.*\})").expect("valid think regex"));

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json(.*?)```").expect("valid fence regex"));

static BRACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)(\{.*\})").expect("valid brace regex"));

/// Extracts a JSON object from raw model output.
///
/// Returns `None` when no candidate parses to a JSON object. Never panics and
/// never returns a non-object value.
pub fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();

    // Whole output is a JSON object.
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Some(value) = parse_candidate(trimmed) {
            return Some(value);
        }
    }

    // JSON following a reasoning delimiter.
    if let Some(caps) = THINK_RE.captures(trimmed) {
        if let Some(value) = parse_candidate(caps[1].trim()) {
            return Some(value);
        }
    }

    // JSON inside a fenced code block.
    if let Some(caps) = FENCE_RE.captures(trimmed) {
        if let Some(value) = parse_candidate(caps[1].trim()) {
            return Some(value);
        }
    }

    // Any brace-delimited substring as a last resort.
    if let Some(caps) = BRACE_RE.captures(trimmed) {
        if let Some(value) = parse_candidate(caps[1].trim()) {
            return Some(value);
        }
    }

    trace!("no JSON object found in model output");
    None
}

/// Parses one candidate string, applying the newline repair pass before
/// giving up on it.
fn parse_candidate(candidate: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        if value.is_object() {
            return Some(value);
        }
    }

    let repaired = escape_newlines_in_strings(candidate);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// Escapes literal newline characters that appear inside JSON string values.
///
/// Walks the candidate tracking string boundaries, so newlines between tokens
/// (legal whitespace) are left alone and only newlines inside string literals
/// are rewritten to `\n`. Carriage returns inside strings get the same
/// treatment since they arrive together on CRLF output.
pub fn escape_newlines_in_strings(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in candidate.chars() {
        if escaped {
            out.push(ch);
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_string => {
                out.push(ch);
                escaped = true;
            }
            '"' => {
                out.push(ch);
                in_string = !in_string;
            }
            '\n' if in_string => out.push_str("\\n"),
            '\r' if in_string => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_output_is_object() {
        let raw = r#"{"primary_mood": "excited", "mood_score": 6.0}"#;
        let value = extract_json(raw).unwrap();
        assert_eq!(value["primary_mood"], "excited");
    }

    #[test]
    fn test_fenced_code_block() {
        let raw = "```json\n{\"questions\": [\"Q1\",\"Q2\"]}\n```";
        let value = extract_json(raw).unwrap();
        assert_eq!(value, json!({"questions": ["Q1", "Q2"]}));
    }

    #[test]
    fn test_after_think_delimiter() {
        let raw = "<think>the user seems happy about the new job</think>\n{\"primary_mood\": \"happy\"}";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["primary_mood"], "happy");
    }

    #[test]
    fn test_brace_substring_anywhere() {
        let raw = "Sure! Here is the analysis you asked for: {\"main_topics\": [\"work\"]} Hope it helps.";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["main_topics"][0], "work");
    }

    #[test]
    fn test_no_json_returns_none() {
        assert!(extract_json("I could not produce an analysis.").is_none());
        assert!(extract_json("").is_none());
    }

    #[test]
    fn test_non_object_json_returns_none() {
        assert!(extract_json("[1, 2, 3]").is_none());
        assert!(extract_json("\"just a string\"").is_none());
    }

    #[test]
    fn test_newline_repair_inside_string() {
        // Literal newline inside a string value is invalid JSON until repaired.
        let raw = "{\"mood_analysis\": \"feeling good\ntoday\"}";
        assert!(serde_json::from_str::<Value>(raw).is_err());

        let value = extract_json(raw).unwrap();
        assert_eq!(value["mood_analysis"], "feeling good\ntoday");
    }

    #[test]
    fn test_repair_equals_properly_escaped_object() {
        let broken = "{\"note\": \"line one\nline two\"}";
        let escaped = "{\"note\": \"line one\\nline two\"}";

        let repaired: Value = serde_json::from_str(&escape_newlines_in_strings(broken)).unwrap();
        let expected: Value = serde_json::from_str(escaped).unwrap();
        assert_eq!(repaired, expected);
    }

    #[test]
    fn test_repair_leaves_structural_newlines_alone() {
        let pretty = "{\n  \"a\": 1,\n  \"b\": 2\n}";
        assert_eq!(escape_newlines_in_strings(pretty), pretty);
    }

    #[test]
    fn test_repair_leaves_already_escaped_newlines_alone() {
        let ok = "{\"note\": \"line one\\nline two\"}";
        assert_eq!(escape_newlines_in_strings(ok), ok);
    }

    #[test]
    fn test_fenced_block_with_newline_in_string() {
        let raw = "```json\n{\"summary\": \"a day\nof change\"}\n```";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["summary"], "a day\nof change");
    }
}
