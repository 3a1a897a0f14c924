// ABOUTME: UI rendering module for lingo
// ABOUTME: Dispatches rendering to widget modules

mod header;
mod messages;
mod status;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::Frame;

pub fn render(f: &mut Frame, app: &App) {
    let banner_height = header::banner_height(app, f.area().width);
    let chunks = Layout::vertical([
        Constraint::Length(1),             // Title
        Constraint::Length(banner_height), // Error banner
        Constraint::Min(1),                // Conversation
        Constraint::Length(5),             // Input area
        Constraint::Length(1),             // Status bar
    ])
    .split(f.area());

    header::render_title(f, chunks[0]);
    header::render_banner(f, chunks[1], app);
    messages::render(f, chunks[2], app);
    f.render_widget(app.input.textarea(), chunks[3]);
    status::render(f, chunks[4], app);
}
