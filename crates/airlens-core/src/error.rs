// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Airlens analysis service.

use thiserror::Error;

/// The primary error type used across all Airlens crates.
#[derive(Debug, Error)]
pub enum AirlensError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// The request carried no image upload.
    #[error("no image file uploaded")]
    MissingUpload,

    /// The uploaded file's declared media type is not an accepted image format.
    #[error("unsupported media type: {mime}")]
    UnsupportedMediaType { mime: String },

    /// The uploaded file exceeds the configured size limit.
    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    /// The uploaded file is below the minimum plausible image size.
    #[error("file too small: {size} bytes (minimum {min})")]
    FileTooSmall { size: usize, min: usize },

    /// The uploaded bytes could not be decoded as an image.
    #[error("image decode failed: {reason}")]
    Decode { reason: String },

    /// The vision provider rejected the request credentials.
    #[error("vision provider authentication failed: {detail}")]
    Auth { detail: String },

    /// The vision provider reported an exhausted quota or rate limit.
    #[error("vision provider quota exceeded: {detail}")]
    Quota { detail: String },

    /// A request or upstream payload exceeded a hard size limit.
    #[error("image payload too large for processing")]
    PayloadTooLarge,

    /// The vision provider rejected the request as malformed.
    #[error("vision provider rejected the request: {detail}")]
    BadUpstreamFormat { detail: String },

    /// The vision provider could not be reached or failed server-side.
    #[error("vision provider unavailable: {detail}")]
    UpstreamUnavailable {
        detail: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No Mallampati classification could be extracted from the model reply.
    #[error("could not extract a Mallampati classification from the model reply")]
    UnparseableResponse,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AirlensError {
    /// Returns the stable machine-readable code reported to API clients.
    ///
    /// Codes are part of the public API contract and must not change
    /// without a corresponding API version bump.
    pub fn code(&self) -> &'static str {
        match self {
            AirlensError::Config(_) => "CONFIG_ERROR",
            AirlensError::MissingUpload => "NO_FILE_UPLOADED",
            AirlensError::UnsupportedMediaType { .. } => "INVALID_FILE_TYPE",
            AirlensError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AirlensError::FileTooSmall { .. } => "FILE_TOO_SMALL",
            AirlensError::Decode { .. } => "IMAGE_DECODE_FAILED",
            AirlensError::Auth { .. } => "API_KEY_ERROR",
            AirlensError::Quota { .. } => "API_QUOTA_EXCEEDED",
            AirlensError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AirlensError::BadUpstreamFormat { .. } => "UPSTREAM_FORMAT_ERROR",
            AirlensError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            AirlensError::UnparseableResponse => "UNPARSEABLE_RESPONSE",
            AirlensError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Returns true when the error was caused by the client's upload
    /// rather than by this service or the vision provider.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AirlensError::MissingUpload
                | AirlensError::UnsupportedMediaType { .. }
                | AirlensError::FileTooLarge { .. }
                | AirlensError::FileTooSmall { .. }
                | AirlensError::Decode { .. }
        )
    }
}
