use std::time::{Duration, Instant};

use chat_core::llm::PromptClient;
use crossterm::event::{self, Event};
use ratatui::{backend::Backend, Terminal};

use crate::{app::App, ui};

pub fn run<B: Backend, C: PromptClient + 'static>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Paste(s) => {
                    app.insert_text(&s.replace("\r\n", "\n"));
                    app.dirty = true;
                }
                Event::Resize(_, _) => app.dirty = true,
                _ => {}
            }
        }

        // Replies are applied here, on the UI thread.
        app.on_tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
