//! Speech transcription pass-through.
//!
//! Audio bodies are forwarded untouched and the upstream reply is handed
//! back verbatim; nothing here interprets the transcript.

use crate::config::TranscriptionConfig;
use crate::error::UpstreamError;
use anyhow::Result;
use async_trait::async_trait;
use axum::body::Bytes;
use std::time::Duration;
use tracing::info;

const SERVICE: &str = "transcription";

/// Content type assumed when the client sends none
pub const DEFAULT_AUDIO_TYPE: &str = "application/octet-stream";

/// Upstream reply, relayed as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionReply {
    pub status: u16,
    pub content_type: String,
    pub body: Bytes,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: Bytes,
        content_type: &str,
    ) -> Result<TranscriptionReply, UpstreamError>;

    fn is_configured(&self) -> bool;
}

/// Upstream URL and API key
struct Endpoint {
    url: String,
    api_key: String,
}

pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: Option<Endpoint>,
}

impl HttpTranscriber {
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let endpoint = match (&config.url, &config.api_key) {
            (Some(url), Some(api_key)) if config.is_configured() => Some(Endpoint {
                url: url.clone(),
                api_key: api_key.clone(),
            }),
            _ => None,
        };

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(
        &self,
        audio: Bytes,
        content_type: &str,
    ) -> Result<TranscriptionReply, UpstreamError> {
        let Some(Endpoint { url, api_key }) = &self.endpoint else {
            return Err(UpstreamError::NotConfigured("Transcription API"));
        };

        info!("Forwarding {} bytes of {} audio", audio.len(), content_type);

        let resp = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", api_key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(audio)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let body = resp
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        info!("Transcription returned HTTP {}", status);
        Ok(TranscriptionReply {
            status,
            content_type,
            body,
        })
    }

    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}
