// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI vision backend for the Airlens analysis service.
//!
//! This crate implements [`VisionBackend`] against the OpenAI chat
//! completions API, sending each prepared photograph with the shared
//! classification prompt and returning the model's raw reply text.

pub mod client;
pub mod prompt;
pub mod types;

use std::time::Duration;

use airlens_config::model::OpenAiConfig;
use airlens_core::{AirlensError, VisionBackend};
use async_trait::async_trait;
use tracing::info;

use crate::client::OpenAiClient;
use crate::prompt::CLASSIFICATION_PROMPT;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, MessageContent};

/// OpenAI vision provider implementing [`VisionBackend`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiVision {
    client: OpenAiClient,
    model: String,
    max_tokens: u32,
    temperature: f64,
    detail: String,
}

impl OpenAiVision {
    /// Creates a new OpenAI vision provider from the given configuration.
    ///
    /// # API Key Resolution
    /// 1. `config.api_key` if set and non-empty
    /// 2. `OPENAI_API_KEY` environment variable
    /// 3. Returns a config error if neither is available
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, AirlensError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;

        info!(model = %config.model, "OpenAI vision provider initialized");

        Ok(Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            detail: config.detail.clone(),
        })
    }

    /// Builds the chat completions request for one classification call.
    ///
    /// The request carries a single user message: the shared prompt as a
    /// text part, then the photograph as a base64 data URL.
    fn build_request(&self, image_base64: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: CLASSIFICATION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{image_base64}"),
                            detail: Some(self.detail.clone()),
                        },
                    },
                ]),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl VisionBackend for OpenAiVision {
    fn model(&self) -> &str {
        &self.model
    }

    async fn classify_image(&self, image_base64: &str) -> Result<String, AirlensError> {
        let request = self.build_request(image_base64);
        let response = self.client.chat_completion(&request).await?;
        extract_reply(response)
    }
}

/// Resolves the API key from config with environment fallback.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, AirlensError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("OPENAI_API_KEY").map_err(|_| {
        AirlensError::Config(
            "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
        )
    })
}

/// Pulls the assistant text out of a chat response.
///
/// An empty or missing reply is a hard failure, never an empty
/// classification.
fn extract_reply(response: ChatResponse) -> Result<String, AirlensError> {
    let reply = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    if reply.trim().is_empty() {
        return Err(AirlensError::BadUpstreamFormat {
            detail: "model reply contained no content".into(),
        });
    }

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Choice, ResponseMessage};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_vision(base_url: &str) -> OpenAiVision {
        let config = OpenAiConfig {
            api_key: Some("test-api-key".into()),
            base_url: base_url.to_string(),
            ..OpenAiConfig::default()
        };
        OpenAiVision::from_config(&config).unwrap()
    }

    fn response_with_content(content: Option<&str>) -> ChatResponse {
        ChatResponse {
            id: "chatcmpl-test".into(),
            model: "gpt-4o".into(),
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: "assistant".into(),
                    content: content.map(str::to_string),
                },
                finish_reason: Some("stop".into()),
            }],
            usage: None,
        }
    }

    #[test]
    fn resolve_api_key_from_config() {
        let result = resolve_api_key(&Some("sk-test-123".into()));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "sk-test-123");
    }

    #[test]
    fn resolve_api_key_empty_config_falls_back_to_env() {
        let result = resolve_api_key(&Some("".into()));
        // Will fail unless OPENAI_API_KEY is set, which is fine for tests.
        // We just verify it never returns the empty string.
        if result.is_ok() {
            assert!(!result.unwrap().is_empty());
        }
    }

    #[test]
    fn build_request_carries_prompt_and_data_url() {
        let vision = test_vision("http://localhost:0");
        let request = vision.build_request("QUJDRA==");

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");

        let MessageContent::Parts(parts) = &request.messages[0].content else {
            panic!("expected multimodal parts");
        };
        assert_eq!(parts.len(), 2);
        match &parts[0] {
            ContentPart::Text { text } => {
                assert!(text.contains("Mallampati classification"));
            }
            other => panic!("expected text part, got {other:?}"),
        }
        match &parts[1] {
            ContentPart::ImageUrl { image_url } => {
                assert_eq!(image_url.url, "data:image/jpeg;base64,QUJDRA==");
                assert_eq!(image_url.detail.as_deref(), Some("high"));
            }
            other => panic!("expected image part, got {other:?}"),
        }
    }

    #[test]
    fn extract_reply_returns_content() {
        let reply = extract_reply(response_with_content(Some("Class III"))).unwrap();
        assert_eq!(reply, "Class III");
    }

    #[test]
    fn extract_reply_rejects_missing_content() {
        let err = extract_reply(response_with_content(None)).unwrap_err();
        assert!(matches!(err, AirlensError::BadUpstreamFormat { .. }));
    }

    #[test]
    fn extract_reply_rejects_blank_content() {
        let err = extract_reply(response_with_content(Some("   "))).unwrap_err();
        assert!(matches!(err, AirlensError::BadUpstreamFormat { .. }));
    }

    #[test]
    fn extract_reply_rejects_empty_choices() {
        let response = ChatResponse {
            id: String::new(),
            model: String::new(),
            choices: vec![],
            usage: None,
        };
        let err = extract_reply(response).unwrap_err();
        assert!(matches!(err, AirlensError::BadUpstreamFormat { .. }));
    }

    #[tokio::test]
    async fn classify_image_returns_raw_reply() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "id": "chatcmpl-vision",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "{\"mallampatiClass\": 2, \"confidence\": 0.9}"
                },
                "finish_reason": "stop"
            }]
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let vision = test_vision(&server.uri());
        let reply = vision.classify_image("QUJD").await.unwrap();
        assert!(reply.contains("mallampatiClass"));
    }
}
