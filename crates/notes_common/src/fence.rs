//! Markdown code-fence stripping.
//!
//! Workflow LLMs like to wrap JSON in ```json fences. The substitutions
//! below run in a fixed order and each one is a no-op when its marker is
//! absent, so unfenced text passes through untouched. Passes repeat until
//! the text stops changing, so stripping an already stripped text is a no-op.

use regex::Regex;
use std::sync::LazyLock;

/// Ordered fence substitutions
static FENCE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        // ```{ -> {
        (Regex::new(r"^```\s*\{").unwrap(), "{"),
        // }``` -> }
        (Regex::new(r"\}\s*```$").unwrap(), "}"),
        // ```json\n
        (Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n").unwrap(), ""),
        // ```\n
        (Regex::new(r"^```\r?\n").unwrap(), ""),
        // \n```
        (Regex::new(r"\r?\n```$").unwrap(), ""),
        // ```json with no newline
        (Regex::new(r"^```[A-Za-z0-9_+-]+").unwrap(), ""),
        // ```
        (Regex::new(r"```$").unwrap(), ""),
    ]
});

/// Strip leading/trailing code fences and surrounding whitespace
pub fn strip_fences(raw: &str) -> String {
    let mut result = strip_pass(raw);

    // Every changing pass shortens the text
    loop {
        let next = strip_pass(&result);
        if next == result {
            return result;
        }
        result = next;
    }
}

fn strip_pass(raw: &str) -> String {
    let mut result = raw.trim().to_string();

    for (pattern, replacement) in FENCE_PATTERNS.iter() {
        result = pattern.replace(&result, *replacement).into_owned();
    }

    result.trim().to_string()
}
