use chat_core::content::{Segment, SegmentKind};
use chat_core::llm::PromptClient;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use textwrap::wrap;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Entry, Sender};
use crate::strings::{code_header, status_line, INPUT_HINT, TITLE_CHAT, TITLE_INPUT, TITLE_PROCESSING};
use crate::theme::THEME;

const CODE_INDENT: &str = "    ";
const INPUT_MAX_LINES: u16 = 6;

pub fn draw<C: PromptClient + 'static>(f: &mut Frame, app: &mut App<C>) {
    let input_width = f.area().width.saturating_sub(2).max(1);
    let input_lines = measure_lines(&app.input, input_width).clamp(1, INPUT_MAX_LINES as usize) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(input_lines + 2),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_chat(f, chunks[0], app);
    draw_input(f, chunks[1], app);
    let status = Paragraph::new(status_line(&app.model_label, &app.endpoint_label, app.in_flight(), app.tick()))
        .style(Style::default().fg(THEME.border_inactive));
    f.render_widget(status, chunks[2]);
}

fn draw_chat<C: PromptClient + 'static>(f: &mut Frame, area: Rect, app: &mut App<C>) {
    let inner_w = area.width.saturating_sub(2).max(1) as usize;
    let inner_h = area.height.saturating_sub(2) as usize;
    let lines = transcript_lines(app.transcript.entries(), inner_w);

    let max_scroll = lines.len().saturating_sub(inner_h);
    if app.chat_scroll as usize > max_scroll {
        app.chat_scroll = max_scroll as u16;
    }
    let offset = max_scroll - app.chat_scroll as usize;

    let block = Block::default()
        .title(TITLE_CHAT)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.chat_border));
    let para = Paragraph::new(lines)
        .block(block)
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(para, area);
}

fn draw_input<C: PromptClient + 'static>(f: &mut Frame, area: Rect, app: &App<C>) {
    let busy = app.in_flight();
    let (title, border) = if busy {
        (TITLE_PROCESSING, THEME.border_inactive)
    } else {
        (TITLE_INPUT, THEME.border_focus)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner_w = area.width.saturating_sub(2).max(1);
    let inner_h = area.height.saturating_sub(2) as usize;

    if app.input.is_empty() {
        let hint = Paragraph::new(Span::styled(INPUT_HINT, Style::default().fg(THEME.border_inactive)))
            .block(block);
        f.render_widget(hint, area);
        f.set_cursor_position(Position::new(area.x + 1, area.y + 1));
        return;
    }

    let wrapped = wrap_input(&app.input, inner_w);
    let skip = wrapped.len().saturating_sub(inner_h);
    let visible: Vec<Line> = wrapped.iter().skip(skip).map(|l| Line::from(l.clone())).collect();
    f.render_widget(Paragraph::new(visible).block(block), area);

    // Cursor sits after the grapheme at `input_cursor`.
    let before: String = app.input.graphemes(true).take(app.input_cursor).collect();
    let before_lines = wrap_input(&before, inner_w);
    let row = before_lines.len().saturating_sub(1).saturating_sub(skip);
    let col = before_lines.last().map(|l| UnicodeWidthStr::width(l.as_str())).unwrap_or(0);
    let x = area.x + 1 + (col as u16).min(inner_w.saturating_sub(1));
    let y = area.y + 1 + (row as u16).min(inner_h.saturating_sub(1) as u16);
    f.set_cursor_position(Position::new(x, y));
}

/// Hard-wrap the input by display width, keeping explicit newlines.
fn wrap_input(text: &str, width: u16) -> Vec<String> {
    hard_wrap(text, width as usize)
}

fn measure_lines(text: &str, width: u16) -> usize {
    wrap_input(text, width).len()
}

/// Split on newlines, then break each line at `width` display columns.
/// Whitespace is kept exactly.
fn hard_wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut cur = String::new();
    for g in text.graphemes(true) {
        if g == "\n" {
            out.push(std::mem::take(&mut cur));
            continue;
        }
        if !cur.is_empty() && UnicodeWidthStr::width(cur.as_str()) + UnicodeWidthStr::width(g) > width {
            out.push(std::mem::take(&mut cur));
        }
        cur.push_str(g);
    }
    out.push(cur);
    out
}

pub fn transcript_lines(entries: &[Entry], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in entries {
        let sender_color = match entry.sender {
            Sender::You => THEME.sender_you,
            Sender::Ai => THEME.sender_ai,
            Sender::System => THEME.sender_system,
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", entry.timestamp), Style::default().fg(THEME.timestamp)),
            Span::styled(
                format!("{}:", entry.sender.label()),
                Style::default().fg(sender_color).add_modifier(Modifier::BOLD),
            ),
        ]));
        for seg in &entry.segments {
            match seg.kind {
                SegmentKind::PlainText => push_plain(&mut lines, seg, width),
                SegmentKind::CodeBlock => push_code(&mut lines, seg, width),
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn push_plain(lines: &mut Vec<Line<'static>>, seg: &Segment, width: usize) {
    for raw in seg.body.lines().filter(|l| !l.trim().is_empty()) {
        for w in wrap(raw, width.max(1)) {
            lines.push(Line::from(w.into_owned()));
        }
    }
}

fn push_code(lines: &mut Vec<Line<'static>>, seg: &Segment, width: usize) {
    let style = Style::default().fg(THEME.code_fg).bg(THEME.code_bg);
    if let Some(lang) = &seg.language {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            code_header(lang),
            Style::default()
                .fg(THEME.code_header)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )));
    }
    let room = width.saturating_sub(CODE_INDENT.len());
    for raw in seg.body.lines() {
        if raw.trim().is_empty() {
            lines.push(Line::from(Span::styled(CODE_INDENT, style)));
            continue;
        }
        for chunk in hard_wrap(raw, room) {
            lines.push(Line::from(Span::styled(format!("{CODE_INDENT}{chunk}"), style)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sender: Sender, segments: Vec<Segment>) -> Entry {
        Entry {
            timestamp: "[12:00]".into(),
            sender,
            segments,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn entry_renders_header_body_and_spacer() {
        let e = entry(Sender::Ai, vec![Segment::plain("hello\n\nworld", 0)]);
        let lines: Vec<String> = transcript_lines(&[e], 40).iter().map(text).collect();
        assert_eq!(lines, vec!["[12:00] AI:", "hello", "world", ""]);
    }

    #[test]
    fn code_block_gets_header_and_indent() {
        let e = entry(
            Sender::Ai,
            vec![Segment::code(Some("python"), "def f():\n\n    return 1", 0)],
        );
        let lines: Vec<String> = transcript_lines(&[e], 40).iter().map(text).collect();
        assert_eq!(
            lines,
            vec![
                "[12:00] AI:",
                "",
                "▸ PYTHON CODE",
                "    def f():",
                "    ",
                "        return 1",
                "",
            ]
        );
    }

    #[test]
    fn untagged_code_has_no_header() {
        let e = entry(Sender::You, vec![Segment::code(None, "ls", 0)]);
        let lines: Vec<String> = transcript_lines(&[e], 40).iter().map(text).collect();
        assert_eq!(lines, vec!["[12:00] You:", "    ls", ""]);
    }

    #[test]
    fn input_wraps_on_width_and_newlines() {
        assert_eq!(wrap_input("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_input("ab\ncd", 10), vec!["ab", "cd"]);
        assert_eq!(measure_lines("", 10), 1);
    }

    #[test]
    fn long_code_lines_wrap_under_the_indent() {
        let e = entry(Sender::Ai, vec![Segment::code(None, "abcdefgh", 0)]);
        let lines: Vec<String> = transcript_lines(&[e], 8).iter().map(text).collect();
        assert_eq!(lines, vec!["[12:00] AI:", "    abcd", "    efgh", ""]);
    }
}
