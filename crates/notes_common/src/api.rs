//! HTTP request/response types shared by notesd and notesctl.

use crate::normalize::NormalizedResult;
use crate::render::{RenderedView, ViewKind};
use serde::{Deserialize, Serialize};

/// Default daemon address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Body of `POST /api/format`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatRequest {
    #[serde(default)]
    pub raw_notes: String,
}

/// Successful `POST /api/format` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatResponse {
    pub formatted_notes: String,
    #[serde(default)]
    pub is_structured: bool,
}

impl From<NormalizedResult> for FormatResponse {
    fn from(result: NormalizedResult) -> Self {
        Self {
            formatted_notes: result.text,
            is_structured: result.is_structured,
        }
    }
}

impl From<FormatResponse> for NormalizedResult {
    fn from(response: FormatResponse) -> Self {
        Self {
            text: response.formatted_notes,
            is_structured: response.is_structured,
        }
    }
}

/// Error body for every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The most specific text available for display
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.error)
    }
}

/// `POST /api/render` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResponse {
    pub view: ViewKind,
    pub html: String,
    pub copy_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
}

impl From<&RenderedView> for RenderResponse {
    fn from(view: &RenderedView) -> Self {
        Self {
            view: view.kind(),
            html: view.html().to_string(),
            copy_text: view.copy_text().to_string(),
            json: view.copy_json(),
        }
    }
}

/// `GET /v1/health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub workflow_configured: bool,
    pub transcription_configured: bool,
}
