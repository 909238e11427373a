//! Notes Common - Shared types for the notes formatter daemon and CLI.
//!
//! Holds the response pipeline: fence stripping, classification of upstream
//! workflow output, and rendering of the classified result.

pub mod api;
pub mod fence;
pub mod html;
pub mod normalize;
pub mod render;
pub mod synthesis;

pub use api::*;
pub use fence::strip_fences;
pub use normalize::{classify_text, normalize, Detected, NormalizedResult, Payload, RawOutput};
pub use render::{render, Classified, Download, RenderedView, StructuredRecord, ViewKind};
pub use synthesis::{is_meeting_synthesis, is_truthy, MeetingSynthesis};
