use chat_core::content::{render, segment, Segment};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    You,
    Ai,
    System,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::You => "You",
            Sender::Ai => "AI",
            Sender::System => "System",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Entry {
    pub timestamp: String,
    pub sender: Sender,
    pub segments: Vec<Segment>,
}

/// Rendered conversation plus its fenced text form, which is what the
/// copy-code action searches.
#[derive(Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    display: String,
}

impl Transcript {
    pub fn push(&mut self, sender: Sender, segments: Vec<Segment>) {
        let fenced = render(&segments);
        self.record(sender, segments, &fenced);
    }

    pub fn push_text(&mut self, sender: Sender, text: &str) {
        self.push(sender, segment(text));
    }

    /// Notices are shown verbatim, but their fenced form goes through the
    /// segmenter so stray backticks stay balanced for extraction.
    pub fn push_notice<S: Into<String>>(&mut self, text: S) {
        let text = text.into();
        let fenced = render(&segment(&text));
        self.record(Sender::System, vec![Segment::plain(text, 0)], &fenced);
    }

    fn record(&mut self, sender: Sender, segments: Vec<Segment>, fenced: &str) {
        let timestamp = chrono::Local::now().format("[%H:%M]").to_string();
        self.display
            .push_str(&format!("{} {}:\n{}\n\n", timestamp, sender.label(), fenced));
        self.entries.push(Entry {
            timestamp,
            sender,
            segments,
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn display_text(&self) -> &str {
        &self.display
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.display.clear();
    }
}
