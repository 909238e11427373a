//! Configuration management for notesd.
//!
//! Loads settings from /etc/notes-formatter/config.toml or uses defaults.
//! API keys are normally supplied through the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/notes-formatter/config.toml";

pub const ENV_WORKFLOW_API_KEY: &str = "NOTESD_WORKFLOW_API_KEY";
pub const ENV_WORKFLOW_ID: &str = "NOTESD_WORKFLOW_ID";
pub const ENV_TRANSCRIPTION_API_KEY: &str = "NOTESD_TRANSCRIPTION_API_KEY";
pub const ENV_PORT: &str = "PORT";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size (notes and audio uploads)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Formatting workflow API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_workflow_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub workflow_id: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Workflows routinely take minutes
    #[serde(default = "default_workflow_timeout")]
    pub timeout_secs: u64,
}

fn default_workflow_base_url() -> String {
    "https://api.scoutos.com".to_string()
}

fn default_workflow_timeout() -> u64 {
    300
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            base_url: default_workflow_base_url(),
            workflow_id: String::new(),
            api_key: None,
            timeout_secs: default_workflow_timeout(),
        }
    }
}

impl WorkflowConfig {
    pub fn is_configured(&self) -> bool {
        !self.workflow_id.is_empty() && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Speech transcription API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_transcription_timeout")]
    pub timeout_secs: u64,
}

fn default_transcription_timeout() -> u64 {
    120
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_transcription_timeout(),
        }
    }
}

impl TranscriptionConfig {
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
            && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

impl Config {
    /// Load config from an explicit path, or the default path, or defaults.
    ///
    /// A missing explicit path is an error; a missing default path is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::load_from_path(Path::new(CONFIG_PATH)).unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            })),
        }
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Overlay secrets and the port from the environment
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_WORKFLOW_API_KEY) {
            self.workflow.api_key = Some(key);
        }
        if let Some(id) = lookup(ENV_WORKFLOW_ID) {
            self.workflow.workflow_id = id;
        }
        if let Some(key) = lookup(ENV_TRANSCRIPTION_API_KEY) {
            self.transcription.api_key = Some(key);
        }
        if let Some(port) = lookup(ENV_PORT) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid {}={}", ENV_PORT, port),
            }
        }
    }

    /// Address to bind the listener to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }
}
