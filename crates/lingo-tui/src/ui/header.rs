// ABOUTME: Title line and error banner rendering
// ABOUTME: The banner shows the most recent error until dismissed

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub const TITLE: &str = "AI-Powered Text Processor";

pub fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(TITLE, Style::default().bold())))
        .alignment(Alignment::Center)
        .style(Style::default().on_dark_gray());
    f.render_widget(title, area);
}

/// Rows the banner needs, zero when there is nothing to show
pub fn banner_height(app: &App, width: u16) -> u16 {
    let Some(text) = banner_text(app) else {
        return 0;
    };
    let inner = width.saturating_sub(2).max(1) as usize;
    let rows = text.chars().count().div_ceil(inner).clamp(1, 3);
    rows as u16 + 2
}

pub fn render_banner(f: &mut Frame, area: Rect, app: &App) {
    let Some(text) = banner_text(app) else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().red())
        .title(Span::styled(" Error (Esc to dismiss) ", Style::default().red()));
    let para = Paragraph::new(text)
        .style(Style::default().red())
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(para, area);
}

fn banner_text(app: &App) -> Option<String> {
    let latest = app.state.latest_error()?;
    let older = app.state.errors().count().saturating_sub(1);
    Some(if older > 0 {
        format!("{} (+{} earlier)", latest.message, older)
    } else {
        latest.message.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::{AppState, Readiness};

    #[test]
    fn banner_is_hidden_without_errors() {
        let app = App::new(AppState::new(Readiness::all_ready()), 1);
        assert_eq!(banner_height(&app, 80), 0);
    }

    #[test]
    fn banner_counts_earlier_errors() {
        let mut app = App::new(AppState::new(Readiness::all_ready()), 1);
        app.state.report_error("Error summarizing text: first");
        app.state.report_error("Error translating text: second");
        assert_eq!(
            banner_text(&app).as_deref(),
            Some("Error translating text: second (+1 earlier)")
        );
        assert_eq!(banner_height(&app, 80), 3);
    }
}
