//! HTTP server for notesd

use crate::config::Config;
use crate::routes;
use crate::transcription::{HttpTranscriber, Transcriber};
use crate::workflow::{HttpWorkflow, WorkflowRunner};
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub workflow: Arc<dyn WorkflowRunner>,
    pub transcriber: Arc<dyn Transcriber>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(workflow: Arc<dyn WorkflowRunner>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            workflow,
            transcriber,
            start_time: Instant::now(),
        }
    }

    /// Build state with the real upstream clients
    pub fn from_config(config: &Config) -> Result<Self> {
        let workflow = HttpWorkflow::from_config(&config.workflow)
            .context("Failed to build workflow client")?;
        let transcriber = HttpTranscriber::from_config(&config.transcription)
            .context("Failed to build transcription client")?;

        Ok(Self::new(Arc::new(workflow), Arc::new(transcriber)))
    }
}

/// Assemble the router with all routes and layers
pub fn router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .merge(routes::format_routes())
        .merge(routes::render_routes())
        .merge(routes::transcribe_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;

    if !state.workflow.is_configured() {
        warn!("Workflow API not configured; /api/format will fail until it is");
    }
    if !state.transcriber.is_configured() {
        warn!("Transcription API not configured; /api/transcribe is disabled");
    }

    let app = router(state, config.server.body_limit_bytes);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
