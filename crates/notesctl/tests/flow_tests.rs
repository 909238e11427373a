//! Submit-then-render flow against a fake notesd.

use async_trait::async_trait;
use notes_common::{render, FormatResponse, ViewKind};
use notesctl::actions::{copy_payload, CopyTarget};
use notesctl::client::FormatBackend;
use notesctl::errors::{SubmitError, EXIT_BUSY, EXIT_INVALID_INPUT, EXIT_SERVER_ERROR};
use notesctl::progress::{ProgressRotor, ProgressSink};
use notesctl::submit::Submitter;
use std::time::Duration;

struct CannedBackend {
    reply: Result<FormatResponse, SubmitError>,
}

#[async_trait]
impl FormatBackend for CannedBackend {
    async fn format(&self, _raw_notes: &str) -> Result<FormatResponse, SubmitError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.reply.clone()
    }
}

#[derive(Default)]
struct Quiet {
    finished: bool,
}

impl ProgressSink for Quiet {
    fn show(&mut self, _message: &str) {}

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn synthesis_reply() -> FormatResponse {
    FormatResponse {
        formatted_notes: serde_json::to_string_pretty(&serde_json::json!({
            "bluf": "Ship the pilot in May",
            "meeting_recap": {
                "first_level": {
                    "commitments_made": ["Pilot with two teams"],
                    "open_items": []
                },
                "second_level": { "approach_limitations": "Budget closes in June" }
            }
        }))
        .unwrap(),
        is_structured: true,
    }
}

#[tokio::test(start_paused = true)]
async fn test_structured_flow() {
    let backend = CannedBackend {
        reply: Ok(synthesis_reply()),
    };
    let submitter = Submitter::default();
    let rotor = ProgressRotor::new(&["one", "two"], Duration::from_millis(100));
    let mut sink = Quiet::default();

    let result = rotor
        .run_until(&mut sink, submitter.submit(&backend, "raw notes"))
        .await
        .unwrap();
    assert!(sink.finished);

    let view = render(&result);
    assert_eq!(view.kind(), ViewKind::Structured);
    assert!(view.html().contains("BLUF"));
    assert!(view.html().contains("Ship the pilot in May"));
    assert!(view.html().contains("<li>Pilot with two teams</li>"));
    assert!(view.html().contains("Budget closes in June"));

    let text = view.copy_text();
    assert!(text.contains("Commitments Made\n- Pilot with two teams"));
    assert!(text.contains("Open Items\nNone"));
    assert!(text.contains("Approach Limitations\nBudget closes in June"));
    assert!(text.contains("Mental Model Gaps\nNot provided"));
    assert!(text.contains("Structural Recommendation\nNot provided"));

    let json = copy_payload(&view, CopyTarget::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["bluf"], "Ship the pilot in May");
    assert!(view.download().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_plain_flow() {
    let backend = CannedBackend {
        reply: Ok(FormatResponse {
            formatted_notes: "Action items:\n- call vendor".to_string(),
            is_structured: false,
        }),
    };
    let result = Submitter::default()
        .submit(&backend, "raw notes")
        .await
        .unwrap();

    let view = render(&result);
    assert_eq!(view.kind(), ViewKind::Plain);
    assert_eq!(view.copy_text(), "Action items:\n- call vendor");
    assert!(copy_payload(&view, CopyTarget::Json).is_none());
    assert!(view.download().is_none());
}

#[tokio::test]
async fn test_errors_map_to_exit_codes() {
    let backend = CannedBackend {
        reply: Err(SubmitError::Server("Response missing state".to_string())),
    };
    let submitter = Submitter::default();

    let err = submitter.submit(&backend, "notes").await.unwrap_err();
    assert_eq!(err.exit_code(), EXIT_SERVER_ERROR);
    assert!(err.to_string().contains("Response missing state"));

    let err = submitter.submit(&backend, "  ").await.unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);

    assert_eq!(SubmitError::Busy.exit_code(), EXIT_BUSY);
}
