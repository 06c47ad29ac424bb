// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upload normalization for the vision model.
//!
//! Uploaded images arrive in whatever format and resolution the client
//! produced. Before they go to the model they are decoded, downscaled to
//! a bounded resolution, flattened to RGB, and re-encoded as JPEG. The
//! base64 form of that JPEG is what gets embedded in the request payload.

use airlens_core::AirlensError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

/// Longest edge, in pixels, of the image sent to the vision model.
pub const MAX_DIMENSION: u32 = 1024;

/// Quality setting for the re-encoded JPEG.
const JPEG_QUALITY: u8 = 85;

/// A normalized image ready to embed in a vision request.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Re-encoded JPEG bytes.
    pub jpeg: Vec<u8>,
    /// Base64 of `jpeg`, as placed in the data URL.
    pub base64: String,
    /// Width after normalization.
    pub width: u32,
    /// Height after normalization.
    pub height: u32,
}

/// Decodes an upload and normalizes it for the vision model.
///
/// Images with either edge above [`MAX_DIMENSION`] are downscaled to fit,
/// preserving aspect ratio. Smaller images keep their original size;
/// upscaling never happens. Alpha channels are flattened to RGB since the
/// output is always JPEG.
pub fn prepare_image(bytes: &[u8]) -> Result<PreparedImage, AirlensError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| AirlensError::Decode {
        reason: e.to_string(),
    })?;

    let (w, h) = (decoded.width(), decoded.height());
    // `resize` scales in both directions, so only call it when at least
    // one edge exceeds the bound.
    let bounded = if w > MAX_DIMENSION || h > MAX_DIMENSION {
        decoded.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        decoded
    };

    let rgb = bounded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| AirlensError::Internal(format!("JPEG encoding failed: {e}")))?;

    let base64 = STANDARD.encode(&jpeg);

    Ok(PreparedImage {
        jpeg,
        base64,
        width,
        height,
    })
}

/// Runs [`prepare_image`] on the blocking pool.
///
/// Decoding and re-encoding are CPU-bound, so they are kept off the
/// async executor threads.
pub async fn prepare_image_async(bytes: Vec<u8>) -> Result<PreparedImage, AirlensError> {
    tokio::task::spawn_blocking(move || prepare_image(&bytes))
        .await
        .map_err(|e| AirlensError::Internal(format!("image task failed: {e}")))?
}
