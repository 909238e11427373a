//! Response normalizer.
//!
//! Turns whatever the workflow produced into display-ready text plus a
//! structured flag. JSON parse failure is a routing decision here, never
//! an error: unparseable output is simply plain text.

use crate::fence::strip_fences;
use crate::synthesis::is_meeting_synthesis;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unprocessed workflow output
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    /// Text, possibly fenced markdown wrapping JSON
    Text(String),
    /// Output the workflow already delivered as JSON
    Parsed(Value),
}

impl From<Value> for RawOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RawOutput::Text(s),
            other => RawOutput::Parsed(other),
        }
    }
}

impl From<String> for RawOutput {
    fn from(text: String) -> Self {
        RawOutput::Text(text)
    }
}

/// Display-ready result of one formatting request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub text: String,
    pub is_structured: bool,
}

impl NormalizedResult {
    pub fn structured(text: String) -> Self {
        Self {
            text,
            is_structured: true,
        }
    }

    pub fn plain(text: String) -> Self {
        Self {
            text,
            is_structured: false,
        }
    }
}

/// What a cleaned text turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON with the meeting synthesis shape
    Synthesis(Value),
    /// Any other JSON value
    Json(Value),
    /// Not JSON at all
    Plain,
}

/// Fence-stripped text together with its classification
#[derive(Debug, Clone, PartialEq)]
pub struct Detected {
    pub cleaned: String,
    pub payload: Payload,
}

/// Strip fences and classify the remainder. Shared by the normalizer and
/// the renderer so both sides detect shapes the same way.
pub fn classify_text(text: &str) -> Detected {
    let cleaned = strip_fences(text);

    let payload = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) if is_meeting_synthesis(&value) => Payload::Synthesis(value),
        Ok(value) => Payload::Json(value),
        Err(_) => Payload::Plain,
    };

    Detected { cleaned, payload }
}

/// Normalize raw workflow output
pub fn normalize(raw: RawOutput) -> NormalizedResult {
    match raw {
        RawOutput::Parsed(value) if is_meeting_synthesis(&value) => {
            NormalizedResult::structured(pretty_json(&value))
        }
        RawOutput::Parsed(value) => normalize_text(&pretty_json(&value)),
        RawOutput::Text(text) => normalize_text(&text),
    }
}

fn normalize_text(text: &str) -> NormalizedResult {
    let detected = classify_text(text);

    match detected.payload {
        // Generic JSON is pretty-printed and flagged too; the renderer
        // decides for itself whether it is a synthesis.
        Payload::Synthesis(value) | Payload::Json(value) => {
            NormalizedResult::structured(pretty_json(&value))
        }
        Payload::Plain => NormalizedResult::plain(detected.cleaned),
    }
}

/// Two-space indented JSON
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
