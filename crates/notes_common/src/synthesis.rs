//! Meeting synthesis record produced by the formatting workflow.
//!
//! The workflow answers with a JSON object carrying a `bluf` summary and a
//! three-level `meeting_recap`. Every field below `meeting_recap` is
//! optional; readers render placeholders for whatever is missing.

use serde_json::Value;

/// JSON truthiness: null, false, 0, and "" are falsy; arrays and objects are truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Check for the meeting synthesis shape (truthy `bluf` and `meeting_recap`)
pub fn is_meeting_synthesis(value: &Value) -> bool {
    match value.as_object() {
        Some(obj) => {
            obj.get("bluf").map(is_truthy).unwrap_or(false)
                && obj.get("meeting_recap").map(is_truthy).unwrap_or(false)
        }
        None => false,
    }
}

/// Structured meeting summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingSynthesis {
    /// Bottom Line Up Front
    pub bluf: Option<String>,
    pub meeting_recap: MeetingRecap,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingRecap {
    pub first_level: FirstLevel,
    pub second_level: SecondLevel,
    pub third_level: ThirdLevel,
}

/// What happened in the meeting, as bullet lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FirstLevel {
    pub what_was_covered: Vec<String>,
    pub commitments_made: Vec<String>,
    pub new_information: Vec<String>,
    pub customer_uncertainties: Vec<String>,
    pub open_items: Vec<String>,
}

/// Interpretation of the meeting, as free text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondLevel {
    pub mental_model_gaps: Option<String>,
    pub customer_confidence_signals: Option<String>,
    pub approach_limitations: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThirdLevel {
    pub structural_recommendation: Option<String>,
}

impl MeetingSynthesis {
    /// Read a synthesis out of arbitrary JSON.
    ///
    /// Returns `None` unless the value has the synthesis shape. Inside the
    /// recap, extraction never fails: mistyped fields degrade to text or
    /// to absence.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_meeting_synthesis(value) {
            return None;
        }

        let recap = &value["meeting_recap"];
        Some(Self {
            bluf: text_field(&value["bluf"]),
            meeting_recap: MeetingRecap {
                first_level: FirstLevel::from_value(&recap["first_level"]),
                second_level: SecondLevel::from_value(&recap["second_level"]),
                third_level: ThirdLevel::from_value(&recap["third_level"]),
            },
        })
    }
}

impl FirstLevel {
    fn from_value(value: &Value) -> Self {
        Self {
            what_was_covered: list_field(&value["what_was_covered"]),
            commitments_made: list_field(&value["commitments_made"]),
            new_information: list_field(&value["new_information"]),
            customer_uncertainties: list_field(&value["customer_uncertainties"]),
            open_items: list_field(&value["open_items"]),
        }
    }

    /// Fields in display order, keyed by their JSON name
    pub fn fields(&self) -> [(&'static str, &[String]); 5] {
        [
            ("what_was_covered", self.what_was_covered.as_slice()),
            ("commitments_made", self.commitments_made.as_slice()),
            ("new_information", self.new_information.as_slice()),
            ("customer_uncertainties", self.customer_uncertainties.as_slice()),
            ("open_items", self.open_items.as_slice()),
        ]
    }
}

impl SecondLevel {
    fn from_value(value: &Value) -> Self {
        Self {
            mental_model_gaps: text_field(&value["mental_model_gaps"]),
            customer_confidence_signals: text_field(&value["customer_confidence_signals"]),
            approach_limitations: text_field(&value["approach_limitations"]),
        }
    }

    pub fn fields(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("mental_model_gaps", self.mental_model_gaps.as_deref()),
            (
                "customer_confidence_signals",
                self.customer_confidence_signals.as_deref(),
            ),
            ("approach_limitations", self.approach_limitations.as_deref()),
        ]
    }
}

impl ThirdLevel {
    fn from_value(value: &Value) -> Self {
        Self {
            structural_recommendation: text_field(&value["structural_recommendation"]),
        }
    }

    pub fn fields(&self) -> [(&'static str, Option<&str>); 1] {
        [(
            "structural_recommendation",
            self.structural_recommendation.as_deref(),
        )]
    }
}

/// Scalars become text, null is absence, containers keep their JSON form
fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Arrays yield one entry per non-null item; a lone scalar is a single entry
fn list_field(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text_field).collect(),
        Value::Null => Vec::new(),
        other => text_field(other).into_iter().collect(),
    }
}
