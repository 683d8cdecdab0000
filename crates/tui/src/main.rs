mod app;
mod events;
mod logging;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::{Context, Result};
use providers::ollama::{OllamaClient, OllamaConfig};
use terminal::TerminalGuard;

fn main() -> Result<()> {
    let _log_guard = logging::init()?;

    let cfg = OllamaConfig::from_env_and_file().context("load config")?;
    tracing::info!(target: "tui", "endpoint={} model={} connect_timeout={:?} request_timeout={:?}",
        cfg.endpoint, cfg.model, cfg.connect_timeout, cfg.request_timeout);
    let client = OllamaClient::new(cfg.clone()).context("build http client")?;

    // One worker is enough: at most one request is ever in flight.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("start tokio runtime")?;

    let mut app = app::App::new(client, runtime.handle().clone(), &cfg.model, &cfg.endpoint);
    let mut term = TerminalGuard::new()?;
    events::run(&mut term.terminal, &mut app)
}
