// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat completions API.
//!
//! Provides [`OpenAiClient`] which handles request construction, bearer
//! authentication, and mapping of API failures onto the Airlens error
//! taxonomy. Requests are sent exactly once; callers decide whether a
//! failed analysis is worth resubmitting.

use std::time::Duration;

use airlens_core::AirlensError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// HTTP client for OpenAI API communication.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI API client.
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key for bearer authentication
    /// * `base_url` - API base URL, e.g. "https://api.openai.com/v1"
    /// * `timeout` - per-request timeout
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, AirlensError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                AirlensError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AirlensError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Sends a chat completions request and returns the parsed response.
    ///
    /// Network failures and 5xx statuses map to `UpstreamUnavailable`;
    /// auth, quota, and payload rejections map to their dedicated variants.
    pub async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, AirlensError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AirlensError::UpstreamUnavailable {
                detail: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "chat completion response received");

        if status.is_success() {
            let body =
                response
                    .text()
                    .await
                    .map_err(|e| AirlensError::UpstreamUnavailable {
                        detail: format!("failed to read response body: {e}"),
                        source: Some(Box::new(e)),
                    })?;
            return serde_json::from_str(&body).map_err(|e| AirlensError::BadUpstreamFormat {
                detail: format!("failed to parse API response: {e}"),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_api_error(status, &body))
    }
}

/// Maps an error status and body onto the Airlens error taxonomy.
///
/// The body is consulted first: OpenAI reports quota exhaustion and bad
/// credentials through `error.code`, which is more reliable than the
/// status alone. The HTTP status decides the rest: 401/403 are auth
/// failures, 429 is quota, 413 is an oversized payload, other 4xx mean
/// we sent something the API rejects, and 5xx mean the provider is down.
fn classify_api_error(status: reqwest::StatusCode, body: &str) -> AirlensError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|e| e.error.code.as_deref())
        .unwrap_or_default();
    let detail = match &parsed {
        Some(api_err) => format!(
            "OpenAI API error ({}): {}",
            api_err.error.type_.as_deref().unwrap_or("unknown"),
            api_err.error.message
        ),
        None => format!("API returned {status}: {body}"),
    };

    match code {
        "insufficient_quota" => return AirlensError::Quota { detail },
        "invalid_api_key" => return AirlensError::Auth { detail },
        _ => {}
    }

    match status.as_u16() {
        401 | 403 => AirlensError::Auth { detail },
        429 => AirlensError::Quota { detail },
        413 => AirlensError::PayloadTooLarge,
        400..=499 => AirlensError::BadUpstreamFormat { detail },
        _ => AirlensError::UpstreamUnavailable {
            detail,
            source: None,
        },
    }
}
