// src/llm/normalize.rs
// Turn a raw completion envelope into a stable, always-valid result

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::extract::extract_json_candidate;
use super::request::RequestKind;
use super::result::{
    AnalysisResult, CompletionMetadata, CompletionResult, RecommendationResult, LENGTH_LIMIT_ANALYSIS,
    NO_ANALYSIS, text_value,
};

/// `choices[0].message.content`, or empty when missing or not a string
pub fn completion_content(envelope: &Value) -> &str {
    envelope
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Dispatch on the request kind. Never fails.
pub fn normalize(kind: RequestKind, envelope: &Value) -> CompletionResult {
    match kind {
        RequestKind::Recommendation => CompletionResult::Recommendation(normalize_recommendation(envelope)),
        _ => CompletionResult::Analysis(normalize_analysis(kind, envelope)),
    }
}

pub fn normalize_analysis(kind: RequestKind, envelope: &Value) -> AnalysisResult {
    let content = completion_content(envelope);
    let metadata = CompletionMetadata::from_envelope(envelope);
    let candidate = extract_json_candidate(content);

    let Some(parsed) = parse_object(candidate) else {
        let analysis = if metadata.finish_reason.as_deref() == Some("length") {
            LENGTH_LIMIT_ANALYSIS
        } else if !candidate.is_empty() {
            candidate
        } else {
            NO_ANALYSIS
        };
        warn!(
            "Completion content for {} is not a JSON object (finish_reason={:?}), using fallback",
            kind, metadata.finish_reason
        );
        return AnalysisResult::empty(kind, analysis, metadata);
    };

    debug!("Parsed {} completion with {} fields", kind, parsed.len());

    AnalysisResult {
        short_summary: (kind != RequestKind::Vitals).then(|| string_field(&parsed, "short_summary")),
        analysis: string_field(&parsed, "analysis"),
        confidence: passthrough_field(&parsed, "confidence"),
        scan_details: string_field(&parsed, "scan_details"),
        insights: string_field(&parsed, "insights"),
        metadata,
    }
}

pub fn normalize_recommendation(envelope: &Value) -> RecommendationResult {
    let content = completion_content(envelope);
    let metadata = CompletionMetadata::from_envelope(envelope);
    let candidate = extract_json_candidate(content);

    let Some(parsed) = parse_object(candidate) else {
        warn!(
            "Recommendation content is not a JSON object (finish_reason={:?}), using empty fields",
            metadata.finish_reason
        );
        return RecommendationResult::empty(metadata);
    };

    RecommendationResult {
        insights: string_field(&parsed, "insights"),
        urgency: string_field(&parsed, "urgency"),
        is_medical_condition: passthrough_field(&parsed, "isMedicalCondition"),
        metadata,
    }
}

// Valid JSON that is not an object has no fields to read; treat it as unparsable
fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn string_field(parsed: &Map<String, Value>, key: &str) -> String {
    parsed.get(key).map(text_value).unwrap_or_default()
}

fn passthrough_field(parsed: &Map<String, Value>, key: &str) -> Option<Value> {
    parsed.get(key).filter(|v| !v.is_null()).cloned()
}
