// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait for vision model integrations.
//!
//! The analysis pipeline talks to vision models exclusively through
//! [`VisionBackend`], which uses `#[async_trait]` for dynamic dispatch
//! compatibility. Tests substitute a scripted backend for the real client.

use async_trait::async_trait;

use crate::error::AirlensError;

/// Backend for vision-capable chat models that grade oral-cavity photographs.
///
/// Implementations submit the prepared image together with the
/// classification prompt and return the model's raw reply text. Parsing
/// and risk mapping happen downstream, so backends stay interchangeable.
#[async_trait]
pub trait VisionBackend: Send + Sync + 'static {
    /// Returns the model identifier requests are issued against.
    fn model(&self) -> &str;

    /// Submits a base64-encoded JPEG and returns the raw reply text.
    async fn classify_image(&self, image_base64: &str) -> Result<String, AirlensError>;
}
