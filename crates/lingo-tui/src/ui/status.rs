// ABOUTME: Bottom status bar rendering
// ABOUTME: Shows capability readiness, pending work, and keybinds

use crate::app::{App, Focus};
use lingo_core::{Availability, CapabilityKind, Message};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];

    for kind in CapabilityKind::ALL {
        let (dot, style) = match app.state.readiness().get(kind) {
            Availability::Ready => ("●", Style::default().green()),
            Availability::Absent => ("○", Style::default().dim()),
            Availability::Error(_) => ("✗", Style::default().red()),
        };
        spans.push(Span::styled(format!("{} {} ", dot, kind), style));
    }

    let busy = app.state.messages().iter().filter(|m| m.is_busy()).count();
    if busy > 0 {
        spans.push(Span::styled(
            format!("│ {} {} working ", app.throbber_char(), busy),
            Style::default().yellow(),
        ));
    }

    if app.show_ctrl_c_hint() {
        spans.push(Span::styled(
            "│ Press Ctrl+C again to quit ",
            Style::default().yellow(),
        ));
    } else {
        spans.push(Span::styled(
            format!("│ {} ", key_hints(app)),
            Style::default().dim(),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).style(Style::default().on_dark_gray());
    f.render_widget(para, area);
}

fn key_hints(app: &App) -> String {
    match app.focus {
        Focus::Input => "Enter: send │ Shift+Enter: newline │ Tab: messages │ Ctrl+Q: quit".into(),
        Focus::Messages => {
            let mut hints = vec!["↑↓: select"];
            let selected: Option<&Message> = app
                .selected_id()
                .and_then(|id| app.state.message(id));
            if let Some(msg) = selected {
                if app.state.can_summarize(msg.id) && !msg.is_summarizing {
                    hints.push("s: summarize");
                }
                if app.state.can_translate() {
                    hints.push("t: translate │ ←→: language");
                }
                if msg.is_busy() {
                    hints.push("x: cancel");
                }
            }
            hints.push("Tab: input");
            hints.join(" │ ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use lingo_core::{AppState, Readiness};

    #[test]
    fn input_hints_mention_send() {
        let app = App::new(AppState::new(Readiness::all_ready()), 1);
        assert!(key_hints(&app).starts_with("Enter: send"));
    }

    #[test]
    fn message_hints_follow_selection() {
        let mut app = App::new(AppState::new(Readiness::all_ready()), 1);
        app.state.send("Bonjour");
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(
            key_hints(&app),
            "↑↓: select │ t: translate │ ←→: language │ x: cancel │ Tab: input"
        );
    }
}
