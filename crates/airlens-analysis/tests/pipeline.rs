// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the analysis pipeline.
//!
//! Each test wires an [`AnalysisService`] to a scripted vision backend,
//! so the full path from raw upload bytes to risk assessment runs
//! without any network access. Tests are independent and
//! order-insensitive.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use airlens_analysis::AnalysisService;
use airlens_config::model::UploadConfig;
use airlens_core::{AirlensError, ImageUpload, RiskLevel, VisionBackend};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;

/// Scripted backend: hands out queued replies and records what it saw.
struct MockVision {
    replies: Mutex<VecDeque<Result<String, AirlensError>>>,
    captured: Mutex<Vec<String>>,
}

impl MockVision {
    fn with_replies(replies: Vec<Result<String, AirlensError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            captured: Mutex::new(Vec::new()),
        })
    }

    fn with_reply(reply: &str) -> Arc<Self> {
        Self::with_replies(vec![Ok(reply.to_owned())])
    }

    fn captured_base64(&self) -> Vec<String> {
        self.captured.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionBackend for MockVision {
    fn model(&self) -> &str {
        "mock-vision"
    }

    async fn classify_image(&self, image_base64: &str) -> Result<String, AirlensError> {
        self.captured.lock().unwrap().push(image_base64.to_owned());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock reply queue exhausted")
    }
}

fn jpeg_upload(width: u32, height: u32) -> ImageUpload {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([110, 70, 55]));
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .encode_image(&img)
        .unwrap();
    ImageUpload {
        file_name: Some("airway.jpg".to_owned()),
        content_type: "image/jpeg".to_owned(),
        bytes,
    }
}

fn permissive_limits() -> UploadConfig {
    UploadConfig {
        max_bytes: 20 * 1024 * 1024,
        min_bytes: 16,
    }
}

// ---- Test 1: Full pipeline ----

#[tokio::test]
async fn test_pipeline_returns_low_risk_for_class_two() {
    let reply = r#"{
        "mallampatiClass": 2,
        "confidence": 0.88,
        "visibleStructures": ["soft palate", "uvula", "fauces"],
        "reasoning": "Pillars hidden behind the tongue base."
    }"#;
    let backend = MockVision::with_reply(reply);
    let service = AnalysisService::new(backend, &permissive_limits());

    let result = service.analyze(jpeg_upload(320, 240)).await.unwrap();

    assert_eq!(result.mallampati.class.number(), 2);
    assert_eq!(result.mallampati.confidence, 0.88);
    assert!(!result.mallampati.degraded);
    assert_eq!(result.risk.level, RiskLevel::Low);
    assert!(result
        .risk
        .recommendation
        .starts_with("Low risk identified (Mallampati Class 2)"));
    assert!(result.mallampati.description.starts_with("Class II"));
    assert!(result.image_id.starts_with("img-"));
    assert!(result.timestamp.contains('T') && result.timestamp.ends_with('Z'));
}

#[tokio::test]
async fn test_pipeline_returns_high_risk_for_class_four() {
    let reply = r#"{"mallampatiClass": 4, "confidence": 0.92, "visibleStructures": ["hard palate"], "reasoning": "Only the hard palate is visible."}"#;
    let backend = MockVision::with_reply(reply);
    let service = AnalysisService::new(backend, &permissive_limits());

    let result = service.analyze(jpeg_upload(320, 240)).await.unwrap();

    assert_eq!(result.risk.level, RiskLevel::High);
    assert!(result.risk.recommendation.contains("anesthesiologist"));
    assert!(result.risk.details.contains("elevated risk"));
}

#[tokio::test]
async fn test_risk_bucket_is_binary_across_all_classes() {
    for (class, expected) in [
        (1, RiskLevel::Low),
        (2, RiskLevel::Low),
        (3, RiskLevel::High),
        (4, RiskLevel::High),
    ] {
        let reply = format!(
            r#"{{"mallampatiClass": {class}, "confidence": 0.9, "visibleStructures": ["tonsillar pillars"]}}"#
        );
        let backend = MockVision::with_reply(&reply);
        let service = AnalysisService::new(backend, &permissive_limits());
        let result = service.analyze(jpeg_upload(128, 128)).await.unwrap();
        assert_eq!(result.risk.level, expected, "class {class}");
    }
}

// ---- Test 2: Degraded fallback ----

#[tokio::test]
async fn test_plain_text_reply_degrades_gracefully() {
    let backend = MockVision::with_reply("The airway corresponds to Class III visibility.");
    let service = AnalysisService::new(backend, &permissive_limits());

    let result = service.analyze(jpeg_upload(320, 240)).await.unwrap();

    assert_eq!(result.mallampati.class.number(), 3);
    assert_eq!(result.mallampati.confidence, 0.6);
    assert!(result.mallampati.degraded);
    assert!(result.mallampati.visible_structures.is_empty());
    assert_eq!(result.risk.level, RiskLevel::High);
    // 0.6 is below the advisory threshold.
    assert!(result.risk.recommendation.contains("Note: image quality"));
}

#[tokio::test]
async fn test_unusable_reply_is_an_unparseable_error() {
    let backend = MockVision::with_reply("I cannot assess this image.");
    let service = AnalysisService::new(backend, &permissive_limits());

    let err = service.analyze(jpeg_upload(320, 240)).await.unwrap_err();

    assert!(matches!(err, AirlensError::UnparseableResponse));
    assert_eq!(err.code(), "UNPARSEABLE_RESPONSE");
}

// ---- Test 3: Image normalization ----

#[tokio::test]
async fn test_backend_receives_a_downscaled_jpeg() {
    let reply = r#"{"mallampatiClass": 1, "confidence": 0.9, "visibleStructures": ["tonsillar pillars"]}"#;
    let backend = MockVision::with_reply(reply);
    let service = AnalysisService::new(backend.clone(), &permissive_limits());

    service.analyze(jpeg_upload(2048, 1536)).await.unwrap();

    let captured = backend.captured_base64();
    assert_eq!(captured.len(), 1);
    let jpeg = STANDARD.decode(&captured[0]).unwrap();
    let sent = image::load_from_memory(&jpeg).unwrap();
    assert_eq!(sent.width(), 1024);
    assert_eq!(sent.height(), 768);
}

#[tokio::test]
async fn test_small_uploads_are_not_upscaled() {
    let reply = r#"{"mallampatiClass": 2, "confidence": 0.9}"#;
    let backend = MockVision::with_reply(reply);
    let service = AnalysisService::new(backend.clone(), &permissive_limits());

    service.analyze(jpeg_upload(400, 300)).await.unwrap();

    let captured = backend.captured_base64();
    let jpeg = STANDARD.decode(&captured[0]).unwrap();
    let sent = image::load_from_memory(&jpeg).unwrap();
    assert_eq!(sent.width(), 400);
    assert_eq!(sent.height(), 300);
}

// ---- Test 4: Upload validation ----

#[tokio::test]
async fn test_wrong_mime_never_reaches_the_backend() {
    let backend = MockVision::with_replies(vec![]);
    let service = AnalysisService::new(backend.clone(), &permissive_limits());

    let mut upload = jpeg_upload(64, 64);
    upload.content_type = "application/pdf".to_owned();
    let err = service.analyze(upload).await.unwrap_err();

    assert!(matches!(err, AirlensError::UnsupportedMediaType { .. }));
    assert_eq!(err.code(), "INVALID_FILE_TYPE");
    assert!(backend.captured_base64().is_empty());
}

#[tokio::test]
async fn test_size_limits_come_from_config() {
    let limits = UploadConfig {
        max_bytes: 256,
        min_bytes: 16,
    };
    let backend = MockVision::with_replies(vec![]);
    let service = AnalysisService::new(backend, &limits);

    let err = service.analyze(jpeg_upload(512, 512)).await.unwrap_err();

    assert!(matches!(err, AirlensError::FileTooLarge { limit: 256, .. }));
    assert_eq!(err.code(), "FILE_TOO_LARGE");
}

#[tokio::test]
async fn test_tiny_uploads_are_rejected_before_decoding() {
    let backend = MockVision::with_replies(vec![]);
    let service = AnalysisService::new(backend, &UploadConfig::default());

    let upload = ImageUpload {
        file_name: None,
        content_type: "image/jpeg".to_owned(),
        bytes: vec![0xFF, 0xD8, 0xFF],
    };
    let err = service.analyze(upload).await.unwrap_err();

    assert!(matches!(err, AirlensError::FileTooSmall { .. }));
    assert_eq!(err.code(), "FILE_TOO_SMALL");
}

#[tokio::test]
async fn test_corrupt_image_is_a_decode_error() {
    let backend = MockVision::with_replies(vec![]);
    let service = AnalysisService::new(backend, &permissive_limits());

    let upload = ImageUpload {
        file_name: Some("broken.png".to_owned()),
        content_type: "image/png".to_owned(),
        bytes: vec![0xAB; 4096],
    };
    let err = service.analyze(upload).await.unwrap_err();

    assert!(matches!(err, AirlensError::Decode { .. }));
    assert_eq!(err.code(), "IMAGE_DECODE_FAILED");
}

// ---- Test 5: Backend errors pass through ----

#[tokio::test]
async fn test_quota_error_passes_through_unchanged() {
    let backend = MockVision::with_replies(vec![Err(AirlensError::Quota {
        detail: "insufficient_quota".to_owned(),
    })]);
    let service = AnalysisService::new(backend, &permissive_limits());

    let err = service.analyze(jpeg_upload(128, 128)).await.unwrap_err();

    assert!(matches!(err, AirlensError::Quota { .. }));
    assert_eq!(err.code(), "API_QUOTA_EXCEEDED");
}

// ---- Test 6: Advisory composition ----

#[tokio::test]
async fn test_low_confidence_reply_carries_the_note() {
    let reply = r#"{"mallampatiClass": 2, "confidence": 0.5, "visibleStructures": ["soft palate"]}"#;
    let backend = MockVision::with_reply(reply);
    let service = AnalysisService::new(backend, &permissive_limits());

    let result = service.analyze(jpeg_upload(128, 128)).await.unwrap();

    assert!(result.risk.recommendation.contains("Note: image quality"));
}

#[tokio::test]
async fn test_class_one_without_pillars_is_flagged() {
    let reply = r#"{"mallampatiClass": 1, "confidence": 0.9, "visibleStructures": ["soft palate", "uvula"]}"#;
    let backend = MockVision::with_reply(reply);
    let service = AnalysisService::new(backend, &permissive_limits());

    let result = service.analyze(jpeg_upload(128, 128)).await.unwrap();

    assert_eq!(result.risk.level, RiskLevel::Low);
    assert!(result.risk.recommendation.contains("Verification needed"));
}
