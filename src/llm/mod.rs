// src/llm/mod.rs
// Prompt building, completion client and response normalization

pub mod analyzer;
pub mod client;
pub mod extract;
pub mod messages;
pub mod normalize;
pub mod prompts;
pub mod request;
pub mod result;

pub use analyzer::Analyzer;
pub use client::{ChatCompletion, ClientConfig, CompletionClient};
pub use extract::extract_json_candidate;
pub use messages::{build_messages, ChatMessage, ContentPart, MessageContent, Role};
pub use normalize::{normalize, normalize_analysis, normalize_recommendation};
pub use request::{CompletionRequest, ImageKind, RequestBody, RequestKind, TextKind};
pub use result::{AnalysisResult, CompletionMetadata, CompletionResult, RecommendationResult};
