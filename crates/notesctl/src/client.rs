//! HTTP client for communicating with notesd.

use crate::errors::SubmitError;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use notes_common::{ErrorResponse, FormatRequest, FormatResponse, HealthResponse};
use tracing::debug;

/// Anything that can turn raw notes into a format response
#[async_trait]
pub trait FormatBackend: Send + Sync {
    async fn format(&self, raw_notes: &str) -> Result<FormatResponse, SubmitError>;
}

/// Client for communicating with notesd
pub struct NotesClient {
    client: reqwest::Client,
    base_url: String,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Get daemon health
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .client
            .get(self.url("/v1/health"))
            .send()
            .await
            .with_context(|| format!("Cannot reach notesd at {}", self.base_url))?;

        resp.json()
            .await
            .context("Failed to parse health response")
    }

    /// Upload audio for transcription, returning the upstream reply body
    pub async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<String> {
        let resp = self
            .client
            .post(self.url("/api/transcribe"))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(audio)
            .send()
            .await
            .with_context(|| format!("Cannot reach notesd at {}", self.base_url))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.display_message().to_string())
                .unwrap_or(text);
            return Err(anyhow!("Transcription failed ({}): {}", status, message));
        }

        Ok(text)
    }
}

#[async_trait]
impl FormatBackend for NotesClient {
    async fn format(&self, raw_notes: &str) -> Result<FormatResponse, SubmitError> {
        let request = FormatRequest {
            raw_notes: raw_notes.to_string(),
        };

        let resp = self
            .client
            .post(self.url("/api/format"))
            .json(&request)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = resp.status();
        debug!("notesd answered HTTP {}", status);

        if !status.is_success() {
            let message = resp
                .json::<ErrorResponse>()
                .await
                .map(|e| e.display_message().to_string())
                .unwrap_or_else(|_| "Failed to format notes".to_string());
            return Err(SubmitError::Server(message));
        }

        resp.json()
            .await
            .map_err(|e| SubmitError::Transport(format!("Invalid response from notesd: {}", e)))
    }
}
