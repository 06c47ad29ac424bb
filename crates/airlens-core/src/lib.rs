// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Airlens analysis service.
//!
//! This crate provides the error type, the shared domain types for the
//! Mallampati classification pipeline, and the backend trait that vision
//! provider integrations implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AirlensError;
pub use traits::VisionBackend;
pub use types::{
    AnalysisResult, Classification, ImageUpload, MallampatiClass, RiskAssessment, RiskLevel,
};
