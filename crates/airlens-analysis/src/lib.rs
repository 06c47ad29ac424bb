// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analysis pipeline for Mallampati airway classification.
//!
//! [`AnalysisService`] takes a raw upload through four stages: upload
//! validation, image normalization ([`preprocess`]), classification via a
//! [`VisionBackend`](airlens_core::VisionBackend) and reply parsing
//! ([`parser`]), and sedation risk assessment ([`risk`]). Each stage is
//! usable on its own; the service wires them together and attaches the
//! result metadata.

pub mod parser;
pub mod preprocess;
pub mod risk;
pub mod service;

pub use parser::{canonical_json, parse_classification};
pub use preprocess::{prepare_image, prepare_image_async, PreparedImage, MAX_DIMENSION};
pub use risk::assess;
pub use service::{AnalysisService, ACCEPTED_MIME_TYPES};
