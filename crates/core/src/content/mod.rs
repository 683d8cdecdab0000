//! Raw model reply → display segments.
//!
//! `dedup::clean` runs first, then `segment::segment`. `extract` works on the
//! accumulated transcript text, independent of the other two.

pub mod dedup;
pub mod extract;
pub mod segment;

pub use dedup::clean;
pub use extract::{extract_latest, NoCodeBlockFound};
pub use segment::{render, segment, Segment, SegmentKind};

/// Fenced code delimiter.
pub const FENCE: &str = "```";

/// Max length (exclusive, in UTF-16 units) of a first line that reads as a language tag.
const LANGUAGE_TAG_MAX: usize = 20;

/// Strip ASCII control characters and spaces (`<= U+0020`) from both ends.
/// Unicode spaces such as U+00A0 are kept.
fn trim_blank(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}

/// Split an already-trimmed code piece into `(language, body)`.
///
/// The first line is a tag only when the piece spans more than one line and
/// that line is non-empty, shorter than `LANGUAGE_TAG_MAX` and space-free.
fn split_language_tag(piece: &str) -> (Option<&str>, &str) {
    let Some((first, rest)) = piece.split_once('\n') else {
        return (None, piece);
    };
    let first = trim_blank(first);
    if !first.is_empty() && first.encode_utf16().count() < LANGUAGE_TAG_MAX && !first.contains(' ') {
        (Some(first), trim_blank(rest))
    } else {
        (None, piece)
    }
}
