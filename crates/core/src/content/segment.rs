use super::{split_language_tag, trim_blank, FENCE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    PlainText,
    CodeBlock,
}

/// One unit of display content. `language` is only ever set on code blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub language: Option<String>,
    pub body: String,
    pub order: usize,
}

impl Segment {
    pub fn plain<S: Into<String>>(body: S, order: usize) -> Self {
        Self {
            kind: SegmentKind::PlainText,
            language: None,
            body: body.into(),
            order,
        }
    }

    pub fn code<S: Into<String>>(language: Option<&str>, body: S, order: usize) -> Self {
        Self {
            kind: SegmentKind::CodeBlock,
            language: language.map(str::to_string),
            body: body.into(),
            order,
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::CodeBlock
    }
}

/// Split text on fences into ordered plain/code segments.
///
/// Even pieces are prose, odd pieces are code. An unterminated fence leaves a
/// trailing odd piece, which is still emitted as code.
pub fn segment(text: &str) -> Vec<Segment> {
    if trim_blank(text).is_empty() {
        return Vec::new();
    }
    if !text.contains(FENCE) {
        return vec![Segment::plain(trim_blank(text), 0)];
    }

    let mut out: Vec<Segment> = Vec::new();
    for (i, piece) in text.split(FENCE).enumerate() {
        let piece = trim_blank(piece);
        let order = out.len();
        if i % 2 == 0 {
            if !piece.is_empty() {
                out.push(Segment::plain(piece, order));
            }
        } else {
            let (language, body) = split_language_tag(piece);
            out.push(Segment::code(language, body, order));
        }
    }
    out
}

/// Render segments back into the fenced transcript format.
pub fn render(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match s.kind {
            SegmentKind::PlainText => s.body.clone(),
            SegmentKind::CodeBlock => format!(
                "{FENCE}{}\n{}\n{FENCE}",
                s.language.as_deref().unwrap_or(""),
                s.body
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
