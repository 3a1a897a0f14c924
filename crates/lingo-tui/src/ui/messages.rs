// ABOUTME: Conversation rendering
// ABOUTME: Each message shows its text, detection label, actions, and results

use crate::app::{App, Focus};
use chrono::Local;
use lingo_core::Message;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const INDENT: &str = "  ";
const EMPTY_STATE: &str = "Enter some text to start processing";

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.state.messages().is_empty() {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);
        let hint = Paragraph::new(Span::styled(EMPTY_STATE, Style::default().dim()))
            .alignment(Alignment::Center);
        f.render_widget(hint, vertical[1]);
        return;
    }

    let width = (area.width as usize).saturating_sub(INDENT.len() + 1).max(1);
    let mut lines: Vec<Line> = vec![];
    let mut selected_range = None;

    for (i, msg) in app.state.messages().iter().enumerate() {
        let selected = app.focus == Focus::Messages && app.selected == Some(i);
        let start = lines.len();
        lines.push(header_line(msg, selected));
        for line in message_body(app, msg, width) {
            let mut spans = vec![Span::raw(INDENT)];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }
        if selected {
            selected_range = Some((start, lines.len()));
        }
        lines.push(Line::default());
    }

    let height = area.height as usize;
    let max_top = lines.len().saturating_sub(height);
    let mut top = max_top.saturating_sub(app.scroll_offset);
    if let Some((start, end)) = selected_range {
        if start < top {
            top = start;
        } else if end > top + height {
            top = end.saturating_sub(height).min(start);
        }
    }

    let para = Paragraph::new(lines).scroll((top.min(u16::MAX as usize) as u16, 0));
    f.render_widget(para, area);
}

fn header_line(msg: &Message, selected: bool) -> Line<'static> {
    let time = msg
        .timestamp
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string();
    let (marker, style) = if selected {
        ("▶ ", Style::default().cyan().bold())
    } else {
        ("  ", Style::default().bold())
    };
    Line::from(vec![
        Span::styled(marker, Style::default().cyan()),
        Span::styled(msg.id.to_string(), style),
        Span::styled(format!(" {}", time), Style::default().dim()),
    ])
}

/// Lines under a message header, wrapped to `width` columns.
pub fn message_body(app: &App, msg: &Message, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = wrap_text(&msg.text, width)
        .into_iter()
        .map(Line::from)
        .collect();

    if msg.is_processing {
        lines.push(Line::from(Span::styled(
            format!("{} Detecting language...", app.throbber_char()),
            Style::default().dim(),
        )));
    } else if let Some(label) = msg.confidence_label() {
        lines.push(Line::from(Span::styled(label, Style::default().dim())));
    } else if msg.has_error {
        lines.push(Line::from(Span::styled(
            "Could not detect the language.",
            Style::default().red(),
        )));
    }

    let mut actions: Vec<Span<'static>> = vec![];
    if app.state.can_summarize(msg.id) {
        let label = if msg.is_summarizing {
            format!("{} Summarizing...", app.throbber_char())
        } else {
            "[s] Summarize".to_string()
        };
        actions.push(Span::styled(label, Style::default().magenta()));
    }
    if app.state.can_translate() {
        if !actions.is_empty() {
            actions.push(Span::raw("  "));
        }
        let label = if msg.is_translating {
            format!("{} Translating...", app.throbber_char())
        } else {
            "[t] Translate".to_string()
        };
        actions.push(Span::styled(label, Style::default().blue()));
        actions.push(Span::styled(
            format!(" ‹ {} ›", app.target_for(msg.id).name),
            Style::default().dim(),
        ));
    }
    if !actions.is_empty() {
        lines.push(Line::from(actions));
    }

    if let Some(summary) = &msg.summary {
        push_block(&mut lines, "Summary", summary, Color::Magenta, width);
    }
    for (code, text) in &msg.translations {
        let heading = format!("Translated to {}", app.state.language_name(code));
        push_block(&mut lines, &heading, text, Color::Blue, width);
    }

    if msg.summary_error {
        lines.push(Line::from(Span::styled(
            "Failed to summarize. Please try again.",
            Style::default().red(),
        )));
    }
    if msg.translation_error {
        lines.push(Line::from(Span::styled(
            "Failed to translate. Please try again.",
            Style::default().red(),
        )));
    }

    lines
}

fn push_block(lines: &mut Vec<Line<'static>>, heading: &str, text: &str, color: Color, width: usize) {
    let bar = Span::styled("┃ ", Style::default().fg(color));
    lines.push(Line::from(vec![
        bar.clone(),
        Span::styled(heading.to_string(), Style::default().fg(color).bold()),
    ]));
    for row in wrap_text(text, width.saturating_sub(2)) {
        lines.push(Line::from(vec![bar.clone(), Span::raw(row)]));
    }
}

/// Word-wrap `text` to `width` characters, keeping explicit line breaks.
/// Words longer than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = vec![];

    for raw in text.split('\n') {
        let start = out.len();
        let mut current = String::new();
        let mut current_len = 0;

        for word in raw.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > width {
                if current_len > 0 {
                    out.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                out.push(chars.drain(..width).collect());
            }
            if chars.is_empty() {
                continue;
            }
            if current_len > 0 && current_len + 1 + chars.len() > width {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += chars.len();
            current.extend(chars);
        }

        if current_len > 0 || out.len() == start {
            out.push(current);
        }
    }

    out
}
