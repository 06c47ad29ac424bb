// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./airlens.toml` > `~/.config/airlens/airlens.toml`
//! > `/etc/airlens/airlens.toml` with environment variable overrides via the
//! `AIRLENS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AirlensConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/airlens/airlens.toml` (system-wide)
/// 3. `~/.config/airlens/airlens.toml` (user XDG config)
/// 4. `./airlens.toml` (local directory)
/// 5. `AIRLENS_*` environment variables
pub fn load_config() -> Result<AirlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AirlensConfig::default()))
        .merge(Toml::file("/etc/airlens/airlens.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("airlens/airlens.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("airlens.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<AirlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AirlensConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AirlensConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AirlensConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores survive: `AIRLENS_OPENAI_API_KEY` must map to
/// `openai.api_key`, not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("AIRLENS_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: AIRLENS_UPLOAD_MAX_BYTES -> "upload_max_bytes"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("upload_", "upload.", 1);
        mapped.into()
    })
}
