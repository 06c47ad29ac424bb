// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, sane sampling parameters,
//! and consistent upload bounds.

use crate::diagnostic::ConfigError;
use crate::model::AirlensConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const DETAIL_LEVELS: [&str; 3] = ["low", "high", "auto"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AirlensConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate server.host is not empty and looks like an IP or hostname
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must be non-zero".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` is not one of: {}",
                config.server.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate OpenAI settings
    if config.openai.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "openai.model must not be empty".to_string(),
        });
    }

    let base_url = config.openai.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("openai.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.temperature must be between 0.0 and 2.0, got {}",
                config.openai.temperature
            ),
        });
    }

    if config.openai.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "openai.max_tokens must be at least 1".to_string(),
        });
    }

    if config.openai.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "openai.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if !DETAIL_LEVELS.contains(&config.openai.detail.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.detail `{}` is not one of: {}",
                config.openai.detail,
                DETAIL_LEVELS.join(", ")
            ),
        });
    }

    // Validate upload bounds are consistent
    if config.upload.min_bytes == 0 {
        errors.push(ConfigError::Validation {
            message: "upload.min_bytes must be at least 1".to_string(),
        });
    }

    if config.upload.max_bytes <= config.upload.min_bytes {
        errors.push(ConfigError::Validation {
            message: format!(
                "upload.max_bytes ({}) must be greater than upload.min_bytes ({})",
                config.upload.max_bytes, config.upload.min_bytes
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
