// ABOUTME: lingo terminal client library
// ABOUTME: Chat-style TUI and CLI commands over lingo-core

pub mod app;
pub mod cli;
pub mod error;
pub mod state;
pub mod tui;
pub mod ui;
pub mod widgets;

use crate::error::Result;
use crate::state::config::Config;
use lingo_core::{probe, AppState, Dispatcher};
use tokio::sync::mpsc;

/// Probe the configured host, then run the interactive UI until the user quits.
pub async fn run_tui(config: &Config) -> Result<()> {
    let host = lingo_core::host::connect(config.host.url.as_deref(), config.host.timeout())?;
    tracing::info!(host = host.name(), "Probing capability host");
    let report = probe(host.as_ref()).await;
    tracing::info!(readiness = ?report.readiness, "Probe finished");

    let state = AppState::from_probe(&report, config.settings());
    let (tx, mut completions) = mpsc::unbounded_channel();
    let mut dispatcher = Dispatcher::new(host, &report, tx);

    let mut tui = tui::Tui::new()?;
    let mut app = app::App::new(state, config.default_target_index());
    app.run(&mut tui, &mut dispatcher, &mut completions).await?;
    Ok(())
}
