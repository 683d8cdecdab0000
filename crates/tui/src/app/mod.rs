use std::sync::{mpsc, Arc};

use chat_core::content::{clean, extract_latest, segment};
use chat_core::llm::{require_prompt, ClientError, PromptClient, PromptResponse};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use crate::strings::{notice_copy_failed, welcome_message, NOTICE_COPIED};

pub mod input;
pub mod transcript;

pub use transcript::{Entry, Sender, Transcript};

type Reply = Result<PromptResponse, ClientError>;

pub struct App<C: PromptClient + 'static> {
    pub transcript: Transcript,
    pub input: String,
    pub input_cursor: usize,
    pub should_quit: bool,
    /// Lines scrolled up from the bottom of the chat.
    pub chat_scroll: u16,
    pub dirty: bool,
    pub model_label: String,
    pub endpoint_label: String,
    tick: u64,
    client: Arc<C>,
    runtime: Handle,
    llm_rx: Option<mpsc::Receiver<Reply>>,
    clipboard: Option<arboard::Clipboard>,
}

impl<C: PromptClient + 'static> App<C> {
    pub fn new(client: C, runtime: Handle, model: &str, endpoint: &str) -> Self {
        let mut transcript = Transcript::default();
        transcript.push_notice(welcome_message(model, endpoint));
        Self {
            transcript,
            input: String::new(),
            input_cursor: 0,
            should_quit: false,
            chat_scroll: 0,
            dirty: true,
            model_label: model.to_string(),
            endpoint_label: endpoint.to_string(),
            tick: 0,
            client: Arc::new(client),
            runtime,
            llm_rx: None,
            clipboard: None,
        }
    }

    /// True while a request is outstanding; sending is disabled meanwhile.
    pub fn in_flight(&self) -> bool {
        self.llm_rx.is_some()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn submit(&mut self) {
        if self.in_flight() {
            return;
        }
        let text = match require_prompt(&self.input) {
            Ok(t) => t.to_string(),
            Err(e) => {
                self.transcript.push_notice(e.notice());
                self.dirty = true;
                return;
            }
        };
        self.transcript.push_text(Sender::You, &text);
        self.input.clear();
        self.input_cursor = 0;

        let (tx, rx) = mpsc::channel::<Reply>();
        self.llm_rx = Some(rx);
        let client = Arc::clone(&self.client);
        info!(target: "tui", "submit: model={} input_len={} chars", self.model_label, text.len());
        self.runtime.spawn(async move {
            let res = client.send(&text).await;
            if let Err(e) = &res {
                error!(target: "tui", "request failed: {}", e);
            }
            let _ = tx.send(res);
        });

        self.chat_scroll = 0;
        self.dirty = true;
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        let Some(rx) = &self.llm_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(reply) => {
                self.llm_rx = None;
                self.on_reply(reply);
            }
            Err(mpsc::TryRecvError::Empty) => {
                // keep the spinner moving
                self.dirty = true;
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                self.llm_rx = None;
                warn!(target: "tui", "request worker dropped without a reply");
                self.transcript
                    .push_notice(ClientError::Network("request worker stopped".into()).notice());
                self.dirty = true;
            }
        }
    }

    fn on_reply(&mut self, reply: Reply) {
        match reply {
            Ok(resp) => {
                let cleaned = clean(&resp.text);
                self.transcript.push(Sender::Ai, segment(&cleaned));
            }
            Err(e) => self.transcript.push_notice(e.notice()),
        }
        self.chat_scroll = 0;
        self.dirty = true;
    }

    pub fn copy_last_code_block(&mut self) {
        if self.clipboard.is_none() {
            match arboard::Clipboard::new() {
                Ok(c) => self.clipboard = Some(c),
                Err(e) => warn!(target: "tui", "clipboard unavailable: {}", e),
            }
        }
        let mut clipboard = self.clipboard.take();
        self.copy_with(|code| match clipboard.as_mut() {
            Some(c) => c.set_text(code).map_err(|e| e.to_string()),
            None => Err("clipboard not available".to_string()),
        });
        self.clipboard = clipboard;
    }

    /// Find the latest code block and hand it to `write`, recording the outcome.
    pub fn copy_with<F>(&mut self, write: F)
    where
        F: FnOnce(String) -> Result<(), String>,
    {
        let notice = match extract_latest(self.transcript.display_text()) {
            Ok(code) => {
                let len = code.len();
                match write(code) {
                    Ok(()) => {
                        info!(target: "tui", "copied code block len={}", len);
                        NOTICE_COPIED.to_string()
                    }
                    Err(e) => {
                        error!(target: "tui", "clipboard write failed: {}", e);
                        notice_copy_failed(&e)
                    }
                }
            }
            Err(e) => e.to_string(),
        };
        self.transcript.push_notice(notice);
        self.chat_scroll = 0;
        self.dirty = true;
    }

    pub fn clear_chat(&mut self) {
        self.transcript.clear();
        self.chat_scroll = 0;
        self.dirty = true;
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('y') if ctrl => self.copy_last_code_block(),
            KeyCode::Char('l') if ctrl => self.clear_chat(),
            KeyCode::Char('w') if ctrl => self.delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.kill_to_line_start(),
            KeyCode::Char('j') if ctrl => self.insert_text("\n"),
            KeyCode::Enter if shift || alt => self.insert_text("\n"),
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) if !ctrl => self.insert_text(&c.to_string()),
            KeyCode::Backspace => self.delete_left_grapheme(),
            KeyCode::Delete => self.delete_right_grapheme(),
            KeyCode::Left if alt || ctrl => self.move_cursor_word_left(),
            KeyCode::Right if alt || ctrl => self.move_cursor_word_right(),
            KeyCode::Left => self.input_cursor = self.input_cursor.saturating_sub(1),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.move_cursor_line_start(),
            KeyCode::End => self.move_cursor_line_end(),
            KeyCode::PageUp => self.chat_scroll = self.chat_scroll.saturating_add(5),
            KeyCode::PageDown => self.chat_scroll = self.chat_scroll.saturating_sub(5),
            _ => return,
        }
        self.dirty = true;
    }
}
