// src/llm/extract.rs
// Locate the JSON object inside free-form model output

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_JSON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```json\s*(.*?)\s*```").expect("fenced json pattern is valid")
});

static BRACE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("brace span pattern is valid"));

/// Pick the substring of `text` most likely to hold the JSON answer.
///
/// Search order:
/// 1. the first fenced block tagged `json` (any case), inner text trimmed
/// 2. the greedy span from the first `{` to the last `}`
/// 3. `text` itself
///
/// The result is only a candidate; it may still fail to parse.
pub fn extract_json_candidate(text: &str) -> &str {
    if let Some(inner) = FENCED_JSON.captures(text).and_then(|c| c.get(1)) {
        return inner.as_str().trim();
    }

    if let Some(span) = BRACE_SPAN.find(text) {
        return span.as_str();
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_is_unwrapped() {
        let text = "```json\n{\"analysis\":\"ok\",\"confidence\":0.8}\n```";
        assert_eq!(extract_json_candidate(text), r#"{"analysis":"ok","confidence":0.8}"#);
    }

    #[test]
    fn test_fence_tag_is_case_insensitive() {
        let text = "Here you go:\n```JSON\n  {\"a\": 1}  \n```\nanything else?";
        assert_eq!(extract_json_candidate(text), r#"{"a": 1}"#);
    }

    #[test]
    fn test_first_fenced_block_wins() {
        let text = "```json\n{\"a\":1}\n```\nand\n```json\n{\"b\":2}\n```";
        assert_eq!(extract_json_candidate(text), r#"{"a":1}"#);
    }

    #[test]
    fn test_untagged_fence_falls_through_to_braces() {
        let text = "```\n{\"a\":1}\n```";
        assert_eq!(extract_json_candidate(text), r#"{"a":1}"#);
    }

    #[test]
    fn test_brace_span_is_greedy() {
        let text = "Result: {\"a\":{\"b\":2}} and also {\"c\":3} done";
        assert_eq!(extract_json_candidate(text), r#"{"a":{"b":2}} and also {"c":3}"#);
    }

    #[test]
    fn test_brace_span_across_lines() {
        let text = "Sure!\n{\n  \"analysis\": \"fine\"\n}\nTake care.";
        assert_eq!(extract_json_candidate(text), "{\n  \"analysis\": \"fine\"\n}");
    }

    #[test]
    fn test_plain_text_returned_verbatim() {
        assert_eq!(extract_json_candidate("not json at all"), "not json at all");
        assert_eq!(extract_json_candidate(""), "");
        assert_eq!(extract_json_candidate("  spaced  "), "  spaced  ");
    }

    #[test]
    fn test_unclosed_fence_uses_braces() {
        let text = "```json\n{\"analysis\": \"cut off\"}";
        assert_eq!(extract_json_candidate(text), r#"{"analysis": "cut off"}"#);
    }
}
