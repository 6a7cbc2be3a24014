// src/llm/analyzer.rs
// Caller-facing analysis: build prompt, call the model once, normalize

use std::sync::Arc;

use tracing::{error, info};

use super::client::ChatCompletion;
use super::messages::build_messages;
use super::normalize::normalize;
use super::request::CompletionRequest;
use super::result::CompletionResult;
use crate::error::CompletionError;

/// Holds no per-call state; share one across requests.
pub struct Analyzer<C: ChatCompletion> {
    client: Arc<C>,
}

impl<C: ChatCompletion> Clone for Analyzer<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: ChatCompletion> Analyzer<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn from_shared(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Only transport failures come back as errors. Unusable model output
    /// still yields a result, with fallback text in place.
    pub async fn analyze(&self, request: &CompletionRequest) -> Result<CompletionResult, CompletionError> {
        let kind = request.kind();
        let messages = build_messages(request);

        info!("Requesting {} analysis (max_tokens={})", kind, request.max_tokens());
        let envelope = self.client.complete(&messages, request.max_tokens()).await?;

        Ok(normalize(kind, &envelope))
    }

    /// Same as [`Analyzer::analyze`], with transport failures swapped for the
    /// standard fallback ("AI analysis failed." for analyses, empty fields for
    /// recommendations).
    pub async fn analyze_or_fallback(&self, request: &CompletionRequest) -> CompletionResult {
        match self.analyze(request).await {
            Ok(result) => result,
            Err(e) => {
                error!("{} analysis request failed: {}", request.kind(), e);
                CompletionResult::transport_failure(request.kind())
            }
        }
    }
}
