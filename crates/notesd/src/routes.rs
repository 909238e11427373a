//! API routes for notesd

use crate::error::UpstreamError;
use crate::server::AppState;
use crate::transcription::DEFAULT_AUDIO_TYPE;
use crate::workflow::{extract_output, Extracted};
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use notes_common::{
    normalize, render, ErrorResponse, FormatRequest, FormatResponse, HealthResponse,
    NormalizedResult, RenderResponse,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

type AppStateArc = Arc<AppState>;

type ApiError = (StatusCode, Json<ErrorResponse>);

const INDEX_HTML: &str = include_str!("../static/index.html");

fn api_error(status: StatusCode, error: &str, message: Option<String>) -> ApiError {
    let mut body = ErrorResponse::new(error);
    body.message = message;
    (status, Json(body))
}

fn upstream_status(err: &UpstreamError) -> StatusCode {
    match err {
        UpstreamError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        UpstreamError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

// ============================================================================
// Page
// ============================================================================

pub fn page_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ============================================================================
// Format Routes
// ============================================================================

pub fn format_routes() -> Router<AppStateArc> {
    Router::new().route("/api/format", post(format_notes))
}

/// Run the workflow on raw notes and normalize whatever comes back
async fn format_notes(
    State(state): State<AppStateArc>,
    payload: Result<Json<FormatRequest>, JsonRejection>,
) -> Result<Json<FormatResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            "Invalid request body",
            Some(e.body_text()),
        )
    })?;

    let request_id = Uuid::new_v4();
    info!(
        "[{}]  Received request to format notes, length: {}",
        request_id,
        req.raw_notes.len()
    );

    if req.raw_notes.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Missing raw_notes in request body",
            None,
        ));
    }

    let response = state.workflow.run(&req.raw_notes).await.map_err(|e| {
        error!("[{}]  Workflow failed: {}", request_id, e);
        api_error(
            upstream_status(&e),
            "Failed to format notes",
            Some(e.to_string()),
        )
    })?;

    let normalized = match extract_output(&response) {
        Ok(Extracted::Output(raw)) => normalize(raw),
        Ok(Extracted::Fallback(text)) => NormalizedResult::plain(text),
        Err(e) => {
            warn!("[{}]  {}", request_id, e);
            return Err(api_error(
                StatusCode::BAD_GATEWAY,
                "Invalid response structure from workflow API",
                Some(e.to_string()),
            ));
        }
    };

    info!(
        "[{}]  Formatted notes ready ({} chars, structured: {})",
        request_id,
        normalized.text.len(),
        normalized.is_structured
    );
    Ok(Json(normalized.into()))
}

// ============================================================================
// Render Routes
// ============================================================================

pub fn render_routes() -> Router<AppStateArc> {
    Router::new().route("/api/render", post(render_result))
}

/// Lay out a `/api/format` response for the browser
async fn render_result(
    payload: Result<Json<FormatResponse>, JsonRejection>,
) -> Result<Json<RenderResponse>, ApiError> {
    let Json(response) = payload.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            "Invalid request body",
            Some(e.body_text()),
        )
    })?;

    let view = render(&NormalizedResult::from(response));
    Ok(Json(RenderResponse::from(&view)))
}

// ============================================================================
// Transcription Routes
// ============================================================================

pub fn transcribe_routes() -> Router<AppStateArc> {
    Router::new().route("/api/transcribe", post(transcribe))
}

/// Proxy an audio upload to the transcription API
async fn transcribe(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    if !state.transcriber.is_configured() {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Transcription is not configured",
            None,
        ));
    }

    if body.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Missing audio in request body",
            None,
        ));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_AUDIO_TYPE)
        .to_string();

    let reply = state
        .transcriber
        .transcribe(body, &content_type)
        .await
        .map_err(|e| {
            error!("Transcription failed: {}", e);
            api_error(
                upstream_status(&e),
                "Failed to transcribe audio",
                Some(e.to_string()),
            )
        })?;

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, [(header::CONTENT_TYPE, reply.content_type)], reply.body).into_response())
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        workflow_configured: state.workflow.is_configured(),
        transcription_configured: state.transcriber.is_configured(),
    })
}
