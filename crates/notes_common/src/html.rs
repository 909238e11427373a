//! HTML helpers for the result view.

/// Escape text for safe inclusion in HTML content and attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape, then turn line breaks into `<br>`
pub fn escape_with_breaks(text: &str) -> String {
    escape_html(text)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

/// Display title for a JSON field name.
///
/// `customer_confidence_signals` becomes "Customer Confidence Signals";
/// `bluf` is always "BLUF".
pub fn display_title(field: &str) -> String {
    if field.eq_ignore_ascii_case("bluf") {
        return "BLUF".to_string();
    }

    field
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
