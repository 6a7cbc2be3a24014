// src/llm/request.rs
// Typed analysis requests and the closed request-kind tag

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::ConfigError;

/// Request-type tag selecting the system instruction and the result field set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Default,
    Symptom,
    Vitals,
    Recommendation,
    Skin,
    Eye,
    MedicalReport,
}

impl RequestKind {
    pub const ALL: [RequestKind; 7] = [
        RequestKind::Default,
        RequestKind::Symptom,
        RequestKind::Vitals,
        RequestKind::Recommendation,
        RequestKind::Skin,
        RequestKind::Eye,
        RequestKind::MedicalReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Default => "default",
            RequestKind::Symptom => "symptom",
            RequestKind::Vitals => "vitals",
            RequestKind::Recommendation => "recommendation",
            RequestKind::Skin => "skin",
            RequestKind::Eye => "eye",
            RequestKind::MedicalReport => "medical_report",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(RequestKind::Default),
            "symptom" | "symptoms" => Some(RequestKind::Symptom),
            "vitals" => Some(RequestKind::Vitals),
            "recommendation" => Some(RequestKind::Recommendation),
            "skin" => Some(RequestKind::Skin),
            "eye" => Some(RequestKind::Eye),
            "medical_report" | "medical-report" | "report" => Some(RequestKind::MedicalReport),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, RequestKind::Skin | RequestKind::Eye | RequestKind::MedicalReport)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds answered from free text alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Default,
    Symptom,
    Vitals,
}

impl From<TextKind> for RequestKind {
    fn from(kind: TextKind) -> Self {
        match kind {
            TextKind::Default => RequestKind::Default,
            TextKind::Symptom => RequestKind::Symptom,
            TextKind::Vitals => RequestKind::Vitals,
        }
    }
}

/// Kinds answered from an image plus optional context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Skin,
    Eye,
    MedicalReport,
}

impl From<ImageKind> for RequestKind {
    fn from(kind: ImageKind) -> Self {
        match kind {
            ImageKind::Skin => RequestKind::Skin,
            ImageKind::Eye => RequestKind::Eye,
            ImageKind::MedicalReport => RequestKind::MedicalReport,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    TextAnalysis { kind: TextKind, text: String },
    Recommendation { text: String },
    ImageAnalysis {
        kind: ImageKind,
        image_url: String,
        context: Option<String>,
    },
}

/// One analysis call. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    body: RequestBody,
    max_tokens: u32,
}

impl CompletionRequest {
    pub fn text(kind: TextKind, text: impl Into<String>, max_tokens: u32) -> Result<Self, ConfigError> {
        Self::with_budget(
            RequestBody::TextAnalysis { kind, text: text.into() },
            max_tokens,
        )
    }

    pub fn recommendation(text: impl Into<String>, max_tokens: u32) -> Result<Self, ConfigError> {
        Self::with_budget(RequestBody::Recommendation { text: text.into() }, max_tokens)
    }

    pub fn image(
        kind: ImageKind,
        image_url: impl Into<String>,
        context: Option<String>,
        max_tokens: u32,
    ) -> Result<Self, ConfigError> {
        // Blank context carries nothing worth a heading
        let context = context.filter(|c| !c.trim().is_empty());
        Self::with_budget(
            RequestBody::ImageAnalysis {
                kind,
                image_url: image_url.into(),
                context,
            },
            max_tokens,
        )
    }

    /// Build from a loose tag plus input, the shape the REST layer receives.
    ///
    /// Image kinds read `input` as the image URL; every other kind reads it as
    /// free text and ignores `context`. `max_tokens` falls back to the
    /// configured budget for the request family.
    pub fn from_parts(
        kind: RequestKind,
        input: impl Into<String>,
        max_tokens: Option<u32>,
        context: Option<String>,
    ) -> Result<Self, ConfigError> {
        let input = input.into();
        let budget = max_tokens.unwrap_or_else(|| default_budget(kind));
        match kind {
            RequestKind::Default => Self::text(TextKind::Default, input, budget),
            RequestKind::Symptom => Self::text(TextKind::Symptom, input, budget),
            RequestKind::Vitals => Self::text(TextKind::Vitals, input, budget),
            RequestKind::Recommendation => Self::recommendation(input, budget),
            RequestKind::Skin => Self::image(ImageKind::Skin, input, context, budget),
            RequestKind::Eye => Self::image(ImageKind::Eye, input, context, budget),
            RequestKind::MedicalReport => Self::image(ImageKind::MedicalReport, input, context, budget),
        }
    }

    fn with_budget(body: RequestBody, max_tokens: u32) -> Result<Self, ConfigError> {
        if max_tokens == 0 {
            return Err(ConfigError::InvalidTokenBudget);
        }
        Ok(Self { body, max_tokens })
    }

    pub fn kind(&self) -> RequestKind {
        match &self.body {
            RequestBody::TextAnalysis { kind, .. } => (*kind).into(),
            RequestBody::Recommendation { .. } => RequestKind::Recommendation,
            RequestBody::ImageAnalysis { kind, .. } => (*kind).into(),
        }
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

fn default_budget(kind: RequestKind) -> u32 {
    match kind {
        RequestKind::Recommendation => CONFIG.recommendation_max_tokens,
        k if k.is_image() => CONFIG.image_max_tokens,
        _ => CONFIG.text_max_tokens,
    }
}
