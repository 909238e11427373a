//! Copy, download, and export actions for a rendered result.

use anyhow::{Context, Result};
use clap::ValueEnum;
use notes_common::html::escape_html;
use notes_common::RenderedView;
use std::fs;
use std::path::{Path, PathBuf};

/// What the copy action places on the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CopyTarget {
    /// The structured record as pretty-printed JSON
    Json,
    /// The visible content as plain text
    Text,
}

/// Payload for a copy action; `None` when the view has no JSON record
pub fn copy_payload(view: &RenderedView, target: CopyTarget) -> Option<String> {
    match target {
        CopyTarget::Json => view.copy_json(),
        CopyTarget::Text => Some(view.copy_text().to_string()),
    }
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to write clipboard")?;
    Ok(())
}

/// Write the download file into `dir`; `None` for plain results
pub fn save_download(view: &RenderedView, dir: &Path) -> Result<Option<PathBuf>> {
    let Some(download) = view.download() else {
        return Ok(None);
    };

    let path = dir.join(&download.filename);
    fs::write(&path, download.body)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Some(path))
}

/// Wrap the rendered fragment in a standalone HTML page
pub fn html_document(view: &RenderedView, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        view.html()
    )
}

pub fn save_html(view: &RenderedView, path: &Path) -> Result<()> {
    fs::write(path, html_document(view, "Formatted Notes"))
        .with_context(|| format!("Failed to write {}", path.display()))
}
