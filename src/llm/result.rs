// src/llm/result.rs
// Stable result shapes handed back to callers

use serde::Serialize;
use serde_json::{Map, Value};

use super::request::RequestKind;

pub const LENGTH_LIMIT_ANALYSIS: &str = "Response incomplete due to length limit.";
pub const NO_ANALYSIS: &str = "No analysis available.";
pub const AI_FAILED_ANALYSIS: &str = "AI analysis failed.";

/// Provider fields copied through untouched, plus the whole envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletionMetadata {
    pub finish_reason: Option<String>,
    pub usage: Option<Value>,
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_filter_results: Option<Value>,
    /// Full provider response, `null` when the call never produced one
    pub raw: Value,
}

impl CompletionMetadata {
    pub fn from_envelope(envelope: &Value) -> Self {
        let choice = envelope.pointer("/choices/0");
        Self {
            finish_reason: choice
                .and_then(|c| c.get("finish_reason"))
                .and_then(Value::as_str)
                .map(str::to_string),
            usage: envelope.get("usage").filter(|u| !u.is_null()).cloned(),
            model: envelope.get("model").and_then(Value::as_str).map(str::to_string),
            content_filter_results: choice
                .and_then(|c| c.get("content_filter_results"))
                .filter(|r| !r.is_null())
                .cloned(),
            raw: envelope.clone(),
        }
    }
}

/// Result for the text-analysis family and the image kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// `None` only for vitals, where the key is left out entirely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_summary: Option<String>,
    pub analysis: String,
    /// Passed through as the model wrote it
    pub confidence: Option<Value>,
    pub scan_details: String,
    pub insights: String,
    #[serde(flatten)]
    pub metadata: CompletionMetadata,
}

impl AnalysisResult {
    /// All fields empty, `analysis` set to `analysis`
    pub fn empty(kind: RequestKind, analysis: impl Into<String>, metadata: CompletionMetadata) -> Self {
        Self {
            short_summary: (kind != RequestKind::Vitals).then(String::new),
            analysis: analysis.into(),
            confidence: None,
            scan_details: String::new(),
            insights: String::new(),
            metadata,
        }
    }

    /// The caller convention when the completion call itself failed
    pub fn transport_failure(kind: RequestKind) -> Self {
        Self::empty(kind, AI_FAILED_ANALYSIS, CompletionMetadata::default())
    }

    pub fn confidence_score(&self) -> Option<f64> {
        self.confidence.as_ref().and_then(Value::as_f64)
    }

    /// Re-parse an `analysis` that is itself a JSON-encoded object.
    ///
    /// Some model answers double-encode the whole payload into `analysis`.
    /// When that happens, any non-null inner field overwrites its outer
    /// counterpart. Returns whether anything was unwrapped. Opt-in only:
    /// the normalizer never calls this.
    pub fn unwrap_nested_analysis(&mut self) -> bool {
        if !self.analysis.trim_start().starts_with('{') {
            return false;
        }

        let inner: Map<String, Value> = match serde_json::from_str(self.analysis.trim()) {
            Ok(Value::Object(map)) => map,
            _ => return false,
        };

        let present = |key: &str| inner.get(key).filter(|v| !v.is_null());

        if let (Some(summary), Some(value)) = (self.short_summary.as_mut(), present("short_summary")) {
            *summary = text_value(value);
        }
        if let Some(value) = present("confidence") {
            self.confidence = Some(value.clone());
        }
        if let Some(value) = present("scan_details") {
            self.scan_details = text_value(value);
        }
        if let Some(value) = present("insights") {
            self.insights = text_value(value);
        }
        // Last, so the checks above read the original payload
        if let Some(value) = present("analysis") {
            self.analysis = text_value(value);
        }
        true
    }
}

/// Result for the recommendation kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub insights: String,
    /// `Low`, `Medium`, `High`, or empty
    pub urgency: String,
    /// Passed through as the model wrote it; `0` is a real answer
    #[serde(rename = "isMedicalCondition", skip_serializing_if = "Option::is_none")]
    pub is_medical_condition: Option<Value>,
    #[serde(flatten)]
    pub metadata: CompletionMetadata,
}

impl RecommendationResult {
    pub fn empty(metadata: CompletionMetadata) -> Self {
        Self {
            insights: String::new(),
            urgency: String::new(),
            is_medical_condition: None,
            metadata,
        }
    }

    pub fn transport_failure() -> Self {
        Self::empty(CompletionMetadata::default())
    }

    /// `Some(true)` for 1/true, `Some(false)` for 0/false
    pub fn is_medical_condition(&self) -> Option<bool> {
        match self.is_medical_condition.as_ref()? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => match s.trim() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompletionResult {
    Analysis(AnalysisResult),
    Recommendation(RecommendationResult),
}

impl CompletionResult {
    pub fn transport_failure(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Recommendation => {
                CompletionResult::Recommendation(RecommendationResult::transport_failure())
            }
            _ => CompletionResult::Analysis(AnalysisResult::transport_failure(kind)),
        }
    }

    pub fn metadata(&self) -> &CompletionMetadata {
        match self {
            CompletionResult::Analysis(r) => &r.metadata,
            CompletionResult::Recommendation(r) => &r.metadata,
        }
    }

    pub fn as_analysis(&self) -> Option<&AnalysisResult> {
        match self {
            CompletionResult::Analysis(r) => Some(r),
            CompletionResult::Recommendation(_) => None,
        }
    }

    pub fn as_recommendation(&self) -> Option<&RecommendationResult> {
        match self {
            CompletionResult::Recommendation(r) => Some(r),
            CompletionResult::Analysis(_) => None,
        }
    }
}

/// Read a parsed field as text: strings as-is, null as empty, anything else as JSON
pub(crate) fn text_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
