// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the OpenAI chat completions API.
//!
//! Only the fields Airlens actually sends or reads are modeled; unknown
//! response fields are ignored during deserialization.

use serde::{Deserialize, Serialize};

/// A chat completions request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier, e.g. "gpt-4o".
    pub model: String,
    /// Conversation messages. Classification requests carry exactly one
    /// user message holding the prompt and the image.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// A single message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: "user", "assistant", or "system".
    pub role: String,
    /// Message content, either plain text or multimodal parts.
    pub content: MessageContent,
}

/// Message content: either a plain string or a list of typed parts.
///
/// The API accepts both shapes; image requests require the parts form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Multimodal content parts (text and images).
    Parts(Vec<ContentPart>),
}

/// One typed part of a multimodal message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// A text fragment.
    #[serde(rename = "text")]
    Text { text: String },
    /// An image reference, sent as a data URL.
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

/// An image payload inside a content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Image location. Airlens always sends a base64 data URL.
    pub url: String,
    /// Requested detail level ("low", "high", "auto").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A chat completions response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Response identifier.
    #[serde(default)]
    pub id: String,
    /// Model that produced the response.
    #[serde(default)]
    pub model: String,
    /// Generated choices. Classification requests read the first one.
    pub choices: Vec<Choice>,
    /// Token usage, when reported.
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// One generated completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// Position of this choice in the response.
    #[serde(default)]
    pub index: u32,
    /// The generated assistant message.
    pub message: ResponseMessage,
    /// Why generation stopped ("stop", "length", "content_filter").
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message inside a choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Message role, normally "assistant".
    #[serde(default)]
    pub role: String,
    /// Reply text. `None` when the model produced no content.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage counts reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Error response envelope returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Details of an API error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable error message.
    pub message: String,
    /// Error category, e.g. "invalid_request_error".
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    /// Machine-readable code, e.g. "insufficient_quota" or "invalid_api_key".
    #[serde(default)]
    pub code: Option<String>,
}
