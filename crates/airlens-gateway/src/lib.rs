// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Mallampati analysis service.
//!
//! Exposes the analysis pipeline over two routes: `POST /api/analyze`
//! for image uploads and `GET /health` for liveness probes. Responses
//! use a uniform JSON envelope with stable machine-readable error codes,
//! so clients can branch on `code` without parsing prose.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, ServerConfig, BODY_LIMIT_BYTES};
