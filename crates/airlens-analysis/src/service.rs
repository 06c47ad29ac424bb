// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline orchestration: upload validation through risk assessment.

use std::sync::Arc;

use airlens_config::model::UploadConfig;
use airlens_core::{AirlensError, AnalysisResult, ImageUpload, VisionBackend};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{parser, preprocess, risk};

/// Media types accepted for upload. `image/jpg` is non-standard but
/// common enough in the wild to allow.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Runs an upload through the full pipeline.
///
/// The service owns upload validation and everything behind it. The
/// vision backend is dynamic so tests and future providers can swap in
/// without touching the pipeline.
pub struct AnalysisService {
    backend: Arc<dyn VisionBackend>,
    max_bytes: usize,
    min_bytes: usize,
}

impl AnalysisService {
    pub fn new(backend: Arc<dyn VisionBackend>, upload: &UploadConfig) -> Self {
        Self {
            backend,
            max_bytes: upload.max_bytes,
            min_bytes: upload.min_bytes,
        }
    }

    /// Validates and analyzes one uploaded image.
    pub async fn analyze(&self, upload: ImageUpload) -> Result<AnalysisResult, AirlensError> {
        self.validate_upload(&upload)?;

        let started = std::time::Instant::now();
        let file_name = upload.file_name.as_deref().unwrap_or("upload").to_owned();
        info!(
            file = %file_name,
            bytes = upload.bytes.len(),
            mime = %upload.content_type,
            "starting analysis"
        );

        let prepared = preprocess::prepare_image_async(upload.bytes).await?;
        debug!(
            width = prepared.width,
            height = prepared.height,
            jpeg_bytes = prepared.jpeg.len(),
            "image normalized"
        );

        let reply = self.backend.classify_image(&prepared.base64).await?;
        let classification = parser::parse_classification(&reply)?;
        debug!(
            classification = %parser::canonical_json(&classification),
            "classification extracted"
        );
        if classification.degraded {
            warn!(
                class = classification.class.number(),
                "classification recovered from a non-JSON reply"
            );
        }

        let risk = risk::assess(&classification);
        let result = AnalysisResult {
            mallampati: classification,
            risk,
            image_id: format!("img-{}", Uuid::new_v4()),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        info!(
            image_id = %result.image_id,
            class = result.mallampati.class.number(),
            risk = %result.risk.level,
            confidence = result.mallampati.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(result)
    }

    /// Checks the declared media type and size bounds before any decode.
    fn validate_upload(&self, upload: &ImageUpload) -> Result<(), AirlensError> {
        let mime = upload
            .content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if !ACCEPTED_MIME_TYPES.contains(&mime.as_str()) {
            return Err(AirlensError::UnsupportedMediaType {
                mime: upload.content_type.clone(),
            });
        }

        let size = upload.bytes.len();
        if size > self.max_bytes {
            return Err(AirlensError::FileTooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        if size < self.min_bytes {
            return Err(AirlensError::FileTooSmall {
                size,
                min: self.min_bytes,
            });
        }

        Ok(())
    }
}
