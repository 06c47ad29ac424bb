// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the analysis REST API.
//!
//! Handles POST /api/analyze and GET /health. Every response, success or
//! failure, uses a JSON envelope: `{"success": true, "data": ...}` or
//! `{"success": false, "error": ..., "code": ...}`.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use airlens_core::{AirlensError, AnalysisResult, ImageUpload};

use crate::server::GatewayState;

/// Multipart field name carrying the image.
const IMAGE_FIELD: &str = "image";

/// Success envelope for POST /api/analyze.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Always `true` on this path.
    pub success: bool,
    /// The complete analysis result.
    pub data: AnalysisResult,
}

/// Error envelope returned by all endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false` on this path.
    pub success: bool,
    /// Human-readable error description.
    pub error: String,
    /// Stable machine-readable error code.
    pub code: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// ISO 8601 timestamp.
    pub timestamp: String,
}

/// GET /health
///
/// Liveness probe; reports version and current time.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// POST /api/analyze
///
/// Accepts one image as multipart form data under the `image` field and
/// runs it through the analysis pipeline.
pub async fn post_analyze(State(state): State<GatewayState>, multipart: Multipart) -> Response {
    let upload = match read_image_field(multipart).await {
        Ok(upload) => upload,
        Err(err) => return error_response(&err),
    };

    match state.analysis.analyze(upload).await {
        Ok(result) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                success: true,
                data: result,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// Pulls the image field out of the multipart form.
///
/// Fields under other names are skipped. A form that ends without an
/// image field is a missing upload; a body the transport refuses because
/// it exceeds the size cap is reported as too large.
async fn read_image_field(mut multipart: Multipart) -> Result<ImageUpload, AirlensError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(AirlensError::MissingUpload),
            Err(err) => return Err(multipart_error(err)),
        };
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => return Err(multipart_error(err)),
        };

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
    }
}

fn multipart_error(err: MultipartError) -> AirlensError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AirlensError::PayloadTooLarge;
    }
    AirlensError::MissingUpload
}

fn error_response(err: &AirlensError) -> Response {
    let status = status_for(err);
    tracing::warn!(code = err.code(), status = %status, error = %err, "analysis request failed");
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: err.to_string(),
            code: err.code().to_string(),
        }),
    )
        .into_response()
}

/// Maps pipeline errors onto HTTP statuses.
///
/// Upload faults are the client's (400), provider credential problems
/// are ours (500), quota is throttling (429), and provider-side shape
/// or availability problems surface as gateway errors (502/503).
fn status_for(err: &AirlensError) -> StatusCode {
    use AirlensError::*;
    match err {
        MissingUpload | UnsupportedMediaType { .. } | FileTooLarge { .. }
        | FileTooSmall { .. } | Decode { .. } => StatusCode::BAD_REQUEST,
        Auth { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        Quota { .. } => StatusCode::TOO_MANY_REQUESTS,
        PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        BadUpstreamFormat { .. } | UnparseableResponse => StatusCode::BAD_GATEWAY,
        UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        Config(_) | Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
