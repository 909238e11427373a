//! Result renderer.
//!
//! Re-classifies the normalized text on its own (the `is_structured` hint
//! may be stale, or the server may have been bypassed) and lays it out
//! either as the structured meeting synthesis view or as escaped plain
//! text. The returned `RenderedView` owns everything the copy and download
//! actions need.

use crate::html::{display_title, escape_html, escape_with_breaks};
use crate::normalize::{classify_text, pretty_json, NormalizedResult, Payload};
use crate::synthesis::MeetingSynthesis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Placeholder for an empty or missing list
pub const NONE_PLACEHOLDER: &str = "None";

/// Placeholder for blank or missing free text
pub const NOT_PROVIDED_PLACEHOLDER: &str = "Not provided";

/// Label above the plain-text view
pub const PLAIN_LABEL: &str = "Formatted Notes";

pub const DOWNLOAD_MIME: &str = "application/json";

/// A recognized meeting synthesis and the JSON it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRecord {
    pub synthesis: MeetingSynthesis,
    pub raw: Value,
}

/// Renderer-side classification, evaluated once per result
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Structured(Box<StructuredRecord>),
    PlainText(String),
}

impl Classified {
    /// Fence-strip and parse `text`. Only a synthesis-shaped object is
    /// structured; generic JSON is shown as text.
    pub fn from_text(text: &str) -> Self {
        let detected = classify_text(text);

        match detected.payload {
            Payload::Synthesis(raw) => match MeetingSynthesis::from_value(&raw) {
                Some(synthesis) => {
                    Classified::Structured(Box::new(StructuredRecord { synthesis, raw }))
                }
                None => Classified::PlainText(detected.cleaned),
            },
            Payload::Json(_) | Payload::Plain => Classified::PlainText(detected.cleaned),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Structured,
    Plain,
}

/// File offered by the download action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub body: String,
}

/// Rendered result plus the data behind its actions
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    kind: ViewKind,
    html: String,
    text: String,
    record: Option<Value>,
}

impl RenderedView {
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Text for the "copy" action.
    ///
    /// Plain view: the exact cleaned text. Structured view: the visible
    /// content flattened to text, without the action buttons.
    pub fn copy_text(&self) -> &str {
        &self.text
    }

    /// Pretty-printed record for the "copy JSON" action
    pub fn copy_json(&self) -> Option<String> {
        self.record.as_ref().map(pretty_json)
    }

    /// JSON file for the "download" action
    pub fn download(&self) -> Option<Download> {
        self.download_at(Utc::now())
    }

    pub fn download_at(&self, now: DateTime<Utc>) -> Option<Download> {
        self.copy_json().map(|body| Download {
            filename: format!("meeting-synthesis-{}.json", now.format("%Y%m%dT%H%M%SZ")),
            mime: DOWNLOAD_MIME,
            body,
        })
    }
}

/// Render a normalized result. The structured flag is advisory only.
pub fn render(result: &NormalizedResult) -> RenderedView {
    let view = render_classified(Classified::from_text(&result.text));

    if result.is_structured != (view.kind == ViewKind::Structured) {
        debug!(
            "Structured hint {} overridden, rendering {:?} view",
            result.is_structured, view.kind
        );
    }

    view
}

pub fn render_classified(classified: Classified) -> RenderedView {
    match classified {
        Classified::Structured(record) => render_structured(*record),
        Classified::PlainText(text) => render_plain(text),
    }
}

fn render_plain(text: String) -> RenderedView {
    let html = format!(
        "<div class=\"result plain-result\">\
         <div class=\"result-label\">{}</div>\
         <div class=\"result-actions\">\
         <button type=\"button\" class=\"action-btn\" data-action=\"copy-text\">Copy</button>\
         </div>\
         <pre class=\"result-text\">{}</pre>\
         </div>",
        PLAIN_LABEL,
        escape_html(&text)
    );

    RenderedView {
        kind: ViewKind::Plain,
        html,
        text,
        record: None,
    }
}

fn render_structured(record: StructuredRecord) -> RenderedView {
    let sections = synthesis_sections(&record.synthesis);

    let mut html = String::from(
        "<div class=\"result structured-result\">\
         <div class=\"result-actions\">\
         <button type=\"button\" class=\"action-btn\" data-action=\"copy-json\">Copy JSON</button>\
         <button type=\"button\" class=\"action-btn\" data-action=\"download-json\">Download JSON</button>\
         <button type=\"button\" class=\"action-btn\" data-action=\"copy-text\">Copy Text</button>\
         </div>\
         <div class=\"result-body\">",
    );
    for section in &sections {
        write_section_html(&mut html, section, 0);
    }
    html.push_str("</div></div>");

    let text = sections
        .iter()
        .map(|section| {
            let mut lines = Vec::new();
            write_section_text(&mut lines, section);
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    RenderedView {
        kind: ViewKind::Structured,
        html,
        text,
        record: Some(record.raw),
    }
}

enum Body<'a> {
    Text(Option<&'a str>),
    List(&'a [String]),
    Sections(Vec<Section<'a>>),
}

struct Section<'a> {
    title: String,
    body: Body<'a>,
}

impl<'a> Section<'a> {
    fn new(field: &str, body: Body<'a>) -> Self {
        Self {
            title: display_title(field),
            body,
        }
    }
}

/// Fixed layout: BLUF, then the three recap levels
fn synthesis_sections(synthesis: &MeetingSynthesis) -> Vec<Section<'_>> {
    let recap = &synthesis.meeting_recap;

    let first_level = recap
        .first_level
        .fields()
        .into_iter()
        .map(|(name, items)| Section::new(name, Body::List(items)))
        .collect();
    let second_level = recap
        .second_level
        .fields()
        .into_iter()
        .map(|(name, text)| Section::new(name, Body::Text(text)))
        .collect();
    let third_level = recap
        .third_level
        .fields()
        .into_iter()
        .map(|(name, text)| Section::new(name, Body::Text(text)))
        .collect();

    vec![
        Section::new("bluf", Body::Text(synthesis.bluf.as_deref())),
        Section::new(
            "meeting_recap",
            Body::Sections(vec![
                Section::new("first_level", Body::Sections(first_level)),
                Section::new("second_level", Body::Sections(second_level)),
                Section::new("third_level", Body::Sections(third_level)),
            ]),
        ),
    ]
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

fn write_section_html(out: &mut String, section: &Section<'_>, depth: usize) {
    let heading = match depth {
        0 => "h3",
        1 => "h4",
        _ => "h5",
    };

    out.push_str(&format!("<section class=\"result-section depth-{}\">", depth));
    out.push_str(&format!(
        "<{h} class=\"section-title\">{}</{h}>",
        escape_html(&section.title),
        h = heading
    ));

    match &section.body {
        Body::Text(text) => match non_blank(*text) {
            Some(text) => out.push_str(&format!(
                "<p class=\"field-text\">{}</p>",
                escape_with_breaks(text)
            )),
            None => out.push_str(&format!(
                "<p class=\"placeholder\">{}</p>",
                NOT_PROVIDED_PLACEHOLDER
            )),
        },
        Body::List(items) if items.is_empty() => {
            out.push_str(&format!("<p class=\"placeholder\">{}</p>", NONE_PLACEHOLDER))
        }
        Body::List(items) => {
            out.push_str("<ul class=\"field-list\">");
            for item in items.iter() {
                out.push_str(&format!("<li>{}</li>", escape_html(item)));
            }
            out.push_str("</ul>");
        }
        Body::Sections(children) => {
            for child in children {
                write_section_html(out, child, depth + 1);
            }
        }
    }

    out.push_str("</section>");
}

fn write_section_text(lines: &mut Vec<String>, section: &Section<'_>) {
    lines.push(section.title.clone());

    match &section.body {
        Body::Text(text) => {
            lines.push(non_blank(*text).unwrap_or(NOT_PROVIDED_PLACEHOLDER).to_string())
        }
        Body::List(items) if items.is_empty() => lines.push(NONE_PLACEHOLDER.to_string()),
        Body::List(items) => lines.extend(items.iter().map(|item| format!("- {}", item))),
        Body::Sections(children) => {
            for child in children {
                write_section_text(lines, child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn render_value(value: Value) -> RenderedView {
        render(&NormalizedResult::structured(pretty_json(&value)))
    }

    #[test]
    fn test_plain_sentence_with_structured_hint() {
        let view = render(&NormalizedResult::structured(
            "Just a sentence about <things>.".to_string(),
        ));

        assert_eq!(view.kind(), ViewKind::Plain);
        assert!(view.html().contains("Just a sentence about &lt;things&gt;."));
        assert_eq!(view.copy_text(), "Just a sentence about <things>.");
        assert!(view.copy_json().is_none());
        assert!(view.download().is_none());
    }

    #[test]
    fn test_generic_json_renders_plain() {
        let view = render(&NormalizedResult::structured(
            "{\n  \"summary\": \"x\"\n}".to_string(),
        ));

        assert_eq!(view.kind(), ViewKind::Plain);
        assert!(view.html().contains("&quot;summary&quot;"));
    }

    #[test]
    fn test_synthesis_with_plain_hint_renders_structured() {
        let text = r#"```json
{"bluf": "Go", "meeting_recap": {}}
```"#;
        let view = render(&NormalizedResult::plain(text.to_string()));

        assert_eq!(view.kind(), ViewKind::Structured);
    }

    #[test]
    fn test_empty_list_renders_none() {
        let view = render_value(json!({
            "bluf": "b",
            "meeting_recap": {"first_level": {"what_was_covered": []}}
        }));

        assert!(view.html().contains(
            "<h5 class=\"section-title\">What Was Covered</h5><p class=\"placeholder\">None</p>"
        ));
    }

    #[test]
    fn test_list_items_escaped_in_order() {
        let view = render_value(json!({
            "bluf": "b",
            "meeting_recap": {"first_level": {"what_was_covered": ["A & B", "<C>"]}}
        }));

        assert!(view.html().contains(
            "<ul class=\"field-list\"><li>A &amp; B</li><li>&lt;C&gt;</li></ul>"
        ));
    }

    #[test]
    fn test_blank_text_renders_not_provided() {
        let view = render_value(json!({
            "bluf": "b",
            "meeting_recap": {"second_level": {"mental_model_gaps": "  "}}
        }));

        assert!(view.html().contains(
            "<h5 class=\"section-title\">Mental Model Gaps</h5><p class=\"placeholder\">Not provided</p>"
        ));
    }

    #[test]
    fn test_text_line_breaks() {
        let view = render_value(json!({
            "bluf": "b",
            "meeting_recap": {"second_level": {"mental_model_gaps": "line1\nline2"}}
        }));

        assert!(view.html().contains("<p class=\"field-text\">line1<br>line2</p>"));
    }

    #[test]
    fn test_section_order_and_titles() {
        let view = render_value(json!({"bluf": "b", "meeting_recap": {}}));
        let html = view.html();

        let titles = [
            "BLUF",
            "Meeting Recap",
            "First Level",
            "What Was Covered",
            "Commitments Made",
            "New Information",
            "Customer Uncertainties",
            "Open Items",
            "Second Level",
            "Mental Model Gaps",
            "Customer Confidence Signals",
            "Approach Limitations",
            "Third Level",
            "Structural Recommendation",
        ];
        let mut last = 0;
        for title in titles {
            let pos = html[last..]
                .find(&format!(">{}<", title))
                .unwrap_or_else(|| panic!("missing or out of order: {}", title));
            last += pos;
        }
    }

    #[test]
    fn test_copy_text_excludes_actions() {
        let view = render_value(json!({
            "bluf": "Ship it",
            "meeting_recap": {
                "first_level": {"open_items": ["Pricing"]},
                "third_level": {"structural_recommendation": "Pilot"}
            }
        }));
        let text = view.copy_text();

        assert!(text.starts_with("BLUF\nShip it\n\nMeeting Recap\nFirst Level\n"));
        assert!(text.contains("Open Items\n- Pricing"));
        assert!(text.contains("What Was Covered\nNone"));
        assert!(text.contains("Structural Recommendation\nPilot"));
        assert!(!text.contains("Copy JSON"));
        assert!(!text.contains("Download"));
    }

    #[test]
    fn test_copy_json_and_download_share_record() {
        let value = json!({"bluf": "b", "meeting_recap": {"extra": true}});
        let view = render_value(value.clone());

        let copied = view.copy_json().unwrap();
        assert_eq!(serde_json::from_str::<Value>(&copied).unwrap(), value);

        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let download = view.download_at(now).unwrap();
        assert_eq!(download.filename, "meeting-synthesis-20260304T050607Z.json");
        assert_eq!(download.mime, "application/json");
        assert_eq!(download.body, copied);

        // Actions are repeatable
        assert_eq!(view.copy_json().unwrap(), copied);
    }

    #[test]
    fn test_copy_json_keeps_upstream_key_order() {
        let text = r#"{"meeting_recap": {"first_level": {"what_was_covered": ["Pricing"], "commitments_made": []}}, "bluf": "b"}"#;
        let view = render(&NormalizedResult::structured(text.to_string()));

        let copied = view.copy_json().unwrap();
        let recap = copied.find("\"meeting_recap\"").unwrap();
        let bluf = copied.find("\"bluf\"").unwrap();
        let covered = copied.find("\"what_was_covered\"").unwrap();
        let commitments = copied.find("\"commitments_made\"").unwrap();
        assert!(recap < bluf);
        assert!(covered < commitments);
        assert_eq!(view.download().unwrap().body, copied);
    }
}
