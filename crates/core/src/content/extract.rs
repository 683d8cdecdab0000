use thiserror::Error;

use super::{split_language_tag, trim_blank, FENCE};

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("No code block found to copy")]
pub struct NoCodeBlockFound;

/// Body of the most recent fenced block anywhere in `display_text`, with its
/// language line stripped.
///
/// Trailing empty pieces are discarded before scanning, so a transcript that
/// ends on a closing fence still resolves to the block before it.
pub fn extract_latest(display_text: &str) -> Result<String, NoCodeBlockFound> {
    let mut parts: Vec<&str> = display_text.split(FENCE).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    if parts.len() < 2 {
        return Err(NoCodeBlockFound);
    }
    let latest = (1..parts.len())
        .rev()
        .find(|i| i % 2 == 1)
        .ok_or(NoCodeBlockFound)?;
    let (_, body) = split_language_tag(trim_blank(parts[latest]));
    Ok(trim_blank(body).to_string())
}
