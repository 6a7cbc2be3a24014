// src/llm/messages.rs
// Role-tagged chat messages and message-list assembly

use serde::{Deserialize, Serialize};

use super::prompts::{image_instruction, system_instruction};
use super::request::{CompletionRequest, RequestBody};

pub const CONTEXT_HEADING: &str = "Additional user context:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One typed part of a multi-part user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }
}

/// System instruction followed by a single user message
pub fn build_messages(request: &CompletionRequest) -> Vec<ChatMessage> {
    let system = ChatMessage::system(system_instruction(request.kind()));

    let user = match request.body() {
        RequestBody::TextAnalysis { text, .. } | RequestBody::Recommendation { text } => {
            ChatMessage::user(text.clone())
        }
        RequestBody::ImageAnalysis { image_url, context, .. } => {
            let mut prompt = image_instruction(request.kind()).to_string();
            if let Some(context) = context.as_deref().filter(|c| !c.trim().is_empty()) {
                prompt.push_str("\n\n");
                prompt.push_str(CONTEXT_HEADING);
                prompt.push('\n');
                prompt.push_str(context);
            }

            ChatMessage::user_parts(vec![
                ContentPart::Text { text: prompt },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: image_url.clone() },
                },
            ])
        }
    };

    vec![system, user]
}
