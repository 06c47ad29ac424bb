// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Airlens analysis service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Airlens configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AirlensConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenAI vision API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Upload acceptance bounds.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI vision API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to the `OPENAI_API_KEY`
    /// environment variable at startup.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the chat completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Vision-capable model used for classification requests.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature. Kept low so classifications stay stable.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Image detail level requested from the model (low, high, auto).
    #[serde(default = "default_detail")]
    pub detail: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            detail: default_detail(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f64 {
    0.1
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_detail() -> String {
    "high".to_string()
}

/// Upload acceptance bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Minimum accepted upload size in bytes. Files below this are
    /// rejected as implausible images before any decode attempt.
    #[serde(default = "default_min_bytes")]
    pub min_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            min_bytes: default_min_bytes(),
        }
    }
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_min_bytes() -> usize {
    1000
}
