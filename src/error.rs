// src/error.rs
// Error types shared across the crate

use thiserror::Error;

/// Setup problems, raised before any network call is made
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("API key cannot be empty")]
    EmptyApiKey,

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("max_tokens must be a positive integer")]
    InvalidTokenBudget,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Transport-level failures of a completion call.
///
/// Content that cannot be parsed as JSON is not an error; the normalizer
/// absorbs it. Only these cross into the caller.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Completion response is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl CompletionError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::Status { status, .. } => Some(*status),
            CompletionError::Http(e) => e.status().map(|s| s.as_u16()),
            CompletionError::InvalidBody(_) => None,
        }
    }
}
