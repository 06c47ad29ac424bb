// SPDX-FileCopyrightText: 2026 Airlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `airlens serve` command implementation.
//!
//! Wires the configured OpenAI vision provider into the analysis
//! pipeline and serves the HTTP API until SIGINT or SIGTERM.

use std::sync::Arc;

use airlens_analysis::AnalysisService;
use airlens_config::AirlensConfig;
use airlens_core::AirlensError;
use airlens_gateway::{GatewayState, ServerConfig};
use airlens_vision::OpenAiVision;
use tracing::{error, info};

use crate::shutdown;

/// Runs the `airlens serve` command.
pub async fn run_serve(config: AirlensConfig) -> Result<(), AirlensError> {
    init_tracing(&config.server.log_level);

    info!("starting airlens serve");

    let vision = OpenAiVision::from_config(&config.openai).map_err(|e| {
        error!(error = %e, "failed to initialize OpenAI vision provider");
        eprintln!(
            "error: OpenAI API key required. Set openai.api_key in airlens.toml \
             or the OPENAI_API_KEY environment variable."
        );
        e
    })?;

    let analysis = Arc::new(AnalysisService::new(Arc::new(vision), &config.upload));

    let cancel = shutdown::install_signal_handler();

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let state = GatewayState { analysis };

    airlens_gateway::start_server(&server_config, state, cancel).await?;

    info!("airlens serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// The configured level applies to the airlens crates; everything else
/// stays at warn unless RUST_LOG overrides the whole filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let directives = [
        "airlens",
        "airlens_core",
        "airlens_config",
        "airlens_vision",
        "airlens_analysis",
        "airlens_gateway",
    ]
    .map(|krate| format!("{krate}={log_level}"))
    .join(",");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{directives},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
