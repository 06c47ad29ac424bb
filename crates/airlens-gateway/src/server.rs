// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the analysis API.

use std::sync::Arc;

use airlens_analysis::AnalysisService;
use airlens_core::AirlensError;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Transport cap on request bodies. Sits above the configured upload
/// maximum, so in-bounds oversize files reach the service's own check
/// and get reported with accurate numbers.
pub const BODY_LIMIT_BYTES: usize = 12 * 1024 * 1024;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The analysis pipeline behind POST /api/analyze.
    pub analysis: Arc<AnalysisService>,
}

/// Gateway server configuration (mirrors ServerConfig from airlens-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the complete router with routes and middleware.
///
/// Exposed separately from [`start_server`] so tests can drive the
/// router in-process without binding a socket.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/analyze", post(handlers::post_analyze))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the gateway HTTP server.
///
/// Binds to the configured host:port and serves until the shutdown
/// token is cancelled, then finishes in-flight requests and returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), AirlensError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AirlensError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("analysis server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| AirlensError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
