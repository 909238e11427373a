//! Formatting workflow client.
//!
//! The workflow runs remotely and answers with its whole run record. The
//! formatted notes live under `run.state`, either at `llm.output` or at
//! `json_output.output` depending on how the workflow was built.

use crate::config::WorkflowConfig;
use crate::error::{ExtractError, UpstreamError};
use anyhow::Result;
use async_trait::async_trait;
use notes_common::normalize::pretty_json;
use notes_common::{is_truthy, RawOutput};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const SERVICE: &str = "workflow";

/// Runs the formatting workflow for a batch of raw notes
#[async_trait]
pub trait WorkflowRunner: Send + Sync {
    /// Execute the workflow and return its raw response
    async fn run(&self, raw_notes: &str) -> Result<Value, UpstreamError>;

    fn is_configured(&self) -> bool;
}

/// HTTP client for the hosted workflow API
pub struct HttpWorkflow {
    client: reqwest::Client,
    base_url: String,
    workflow_id: String,
    api_key: Option<String>,
}

impl HttpWorkflow {
    pub fn from_config(config: &WorkflowConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            workflow_id: config.workflow_id.clone(),
            // Only kept when the id is set as well
            api_key: config.api_key.clone().filter(|_| config.is_configured()),
        })
    }

    fn execute_url(&self) -> String {
        format!("{}/v2/workflows/{}/execute", self.base_url, self.workflow_id)
    }
}

#[async_trait]
impl WorkflowRunner for HttpWorkflow {
    async fn run(&self, raw_notes: &str) -> Result<Value, UpstreamError> {
        let Some(api_key) = &self.api_key else {
            return Err(UpstreamError::NotConfigured("Workflow API"));
        };

        info!("Calling workflow {}...", self.workflow_id);
        let start = Instant::now();

        let resp = self
            .client
            .post(self.execute_url())
            .bearer_auth(api_key)
            .json(&json!({ "inputs": { "raw_notes": raw_notes } }))
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(SERVICE, e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        let body: Value = resp.json().await.map_err(|e| UpstreamError::InvalidBody {
            service: SERVICE,
            message: e.to_string(),
        })?;

        info!(
            "Workflow completed in {:.2} seconds",
            start.elapsed().as_secs_f64()
        );
        Ok(body)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// What a workflow response yielded
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// Output found at a known path, to be normalized
    Output(RawOutput),
    /// Unknown layout: the whole response, pretty-printed
    Fallback(String),
}

/// Pull the formatted notes out of a workflow response
pub fn extract_output(response: &Value) -> Result<Extracted, ExtractError> {
    let state = match response.pointer("/run/state") {
        Some(state) if is_truthy(state) => state,
        _ => {
            warn!("No state found in workflow response");
            return Err(ExtractError::MissingState);
        }
    };

    if let Some(output) = state.pointer("/llm/output").filter(|v| is_truthy(v)) {
        return Ok(Extracted::Output(RawOutput::from(output.clone())));
    }

    if let Some(output) = state.pointer("/json_output/output").filter(|v| is_truthy(v)) {
        return Ok(Extracted::Output(RawOutput::from(output.clone())));
    }

    let state_keys: Vec<&str> = state
        .as_object()
        .map(|obj| {
            obj.keys()
                .map(String::as_str)
                .filter(|k| !k.starts_with("__") && *k != "inputs")
                .collect()
        })
        .unwrap_or_default();
    warn!(
        "Could not extract formatted notes. Available state keys: {:?}",
        state_keys
    );

    Ok(Extracted::Fallback(pretty_json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_output_preferred() {
        let response = json!({"run": {"state": {
            "llm": {"output": "from llm"},
            "json_output": {"output": "from json"}
        }}});

        assert_eq!(
            extract_output(&response).unwrap(),
            Extracted::Output(RawOutput::Text("from llm".to_string()))
        );
    }

    #[test]
    fn test_json_output_object() {
        let response = json!({"run": {"state": {
            "llm": {"output": ""},
            "json_output": {"output": {"bluf": "b", "meeting_recap": {}}}
        }}});

        assert_eq!(
            extract_output(&response).unwrap(),
            Extracted::Output(RawOutput::Parsed(json!({"bluf": "b", "meeting_recap": {}})))
        );
    }

    #[test]
    fn test_unknown_layout_falls_back_to_payload() {
        let response = json!({"run": {"state": {"inputs": {"raw_notes": "x"}, "other": 1}}});

        match extract_output(&response).unwrap() {
            Extracted::Fallback(text) => {
                assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), response);
                assert!(text.contains("\n  \"run\""));
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_state() {
        assert_eq!(
            extract_output(&json!({"run": {}})),
            Err(ExtractError::MissingState)
        );
        assert_eq!(extract_output(&json!({})), Err(ExtractError::MissingState));
    }

    #[test]
    fn test_execute_url_trims_slash() {
        let workflow = HttpWorkflow::from_config(&WorkflowConfig {
            base_url: "https://api.example.com/".to_string(),
            workflow_id: "wf_1".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            workflow.execute_url(),
            "https://api.example.com/v2/workflows/wf_1/execute"
        );
        assert!(!workflow.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_run_fails_without_network() {
        let workflow = HttpWorkflow::from_config(&WorkflowConfig::default()).unwrap();
        let err = workflow.run("notes").await.unwrap_err();
        assert!(matches!(err, UpstreamError::NotConfigured(_)));
    }

    #[test]
    fn test_key_without_workflow_id_is_unconfigured() {
        let mut config = WorkflowConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(!HttpWorkflow::from_config(&config).unwrap().is_configured());

        config.workflow_id = "wf_1".to_string();
        assert!(HttpWorkflow::from_config(&config).unwrap().is_configured());

        config.api_key = Some(String::new());
        assert!(!HttpWorkflow::from_config(&config).unwrap().is_configured());
    }
}
