// src/records.rs
// Health records a caller persists once an analysis comes back

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::request::{CompletionRequest, RequestBody, RequestKind};
use crate::llm::result::{AnalysisResult, CompletionResult, RecommendationResult};

/// What the user submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordInput {
    Text { text: String },
    Image { image_url: String, context: Option<String> },
}

impl From<&RequestBody> for RecordInput {
    fn from(body: &RequestBody) -> Self {
        match body {
            RequestBody::TextAnalysis { text, .. } | RequestBody::Recommendation { text } => {
                RecordInput::Text { text: text.clone() }
            }
            RequestBody::ImageAnalysis { image_url, context, .. } => RecordInput::Image {
                image_url: image_url.clone(),
                context: context.clone(),
            },
        }
    }
}

/// Symptom, vitals and scan reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub kind: RequestKind,
    pub input: RecordInput,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub short_summary: Option<String>,
    pub analysis: String,
    pub confidence: Option<f64>,
    pub scan_details: String,
    pub insights: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(owner_id: impl Into<String>, kind: RequestKind, input: RecordInput, result: &AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            kind,
            input,
            short_summary: result.short_summary.clone(),
            analysis: result.analysis.clone(),
            confidence: result.confidence_score(),
            scan_details: result.scan_details.clone(),
            insights: result.insights.clone(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub input: RecordInput,
    pub insights: String,
    pub urgency: String,
    #[serde(rename = "isMedicalCondition")]
    pub is_medical_condition: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl RecommendationRecord {
    pub fn new(owner_id: impl Into<String>, input: RecordInput, result: &RecommendationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            input,
            insights: result.insights.clone(),
            urgency: result.urgency.clone(),
            is_medical_condition: result.is_medical_condition(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthRecord {
    Analysis(AnalysisRecord),
    Recommendation(RecommendationRecord),
}

impl HealthRecord {
    /// Merge a normalized result into a fresh record. Provider metadata is not kept.
    pub fn from_result(owner_id: impl Into<String>, request: &CompletionRequest, result: &CompletionResult) -> Self {
        let input = RecordInput::from(request.body());
        match result {
            CompletionResult::Analysis(r) => {
                HealthRecord::Analysis(AnalysisRecord::new(owner_id, request.kind(), input, r))
            }
            CompletionResult::Recommendation(r) => {
                HealthRecord::Recommendation(RecommendationRecord::new(owner_id, input, r))
            }
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            HealthRecord::Analysis(r) => r.id,
            HealthRecord::Recommendation(r) => r.id,
        }
    }
}
