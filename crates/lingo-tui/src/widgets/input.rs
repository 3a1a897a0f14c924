// ABOUTME: Compose box wrapping tui-textarea.
// ABOUTME: Keeps a bounded history of sent text, recalled with Up/Down.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};
use std::collections::VecDeque;
use tui_textarea::TextArea;

/// Oldest sent entries are forgotten past this many.
const MAX_HISTORY_SIZE: usize = 200;

pub struct InputWidget<'a> {
    textarea: TextArea<'a>,
    history: VecDeque<String>,
    history_idx: Option<usize>,
    draft: String,
}

impl Default for InputWidget<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> InputWidget<'a> {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("Type text to detect, translate, or summarize");
        textarea.set_cursor_line_style(Style::default());
        Self {
            textarea,
            history: VecDeque::new(),
            history_idx: None,
            draft: String::new(),
        }
    }

    pub fn textarea(&self) -> &TextArea<'a> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'a> {
        &mut self.textarea
    }

    /// Style the box for focused or unfocused display.
    pub fn set_focused(&mut self, focused: bool) {
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        self.textarea.set_block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(border)
                .title(" Message "),
        );
        let cursor = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
    }

    /// Current content with lines joined by '\n'
    pub fn get_content(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|l| l.is_empty())
    }

    /// Take the content, record it in history, and reset the box.
    pub fn submit(&mut self) -> String {
        let content = self.get_content();
        self.add_to_history(content.clone());
        self.clear();
        content
    }

    pub fn add_to_history(&mut self, entry: String) {
        if entry.trim().is_empty() {
            return;
        }
        if self.history.back() == Some(&entry) {
            return;
        }
        self.history.push_back(entry);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }

    /// Recall an older entry. Returns true if the content changed.
    pub fn history_up(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let idx = match self.history_idx {
            None => {
                self.draft = self.get_content();
                self.history.len() - 1
            }
            Some(0) => return false,
            Some(idx) => idx - 1,
        };
        self.history_idx = Some(idx);
        let content = self.history[idx].clone();
        self.set_textarea_content(&content);
        true
    }

    /// Recall a newer entry, restoring the draft past the newest one.
    pub fn history_down(&mut self) -> bool {
        let Some(idx) = self.history_idx else {
            return false;
        };
        if idx + 1 < self.history.len() {
            self.history_idx = Some(idx + 1);
            let content = self.history[idx + 1].clone();
            self.set_textarea_content(&content);
        } else {
            self.history_idx = None;
            let draft = std::mem::take(&mut self.draft);
            self.set_textarea_content(&draft);
        }
        true
    }

    pub fn is_in_history_mode(&self) -> bool {
        self.history_idx.is_some()
    }

    pub fn clear(&mut self) {
        self.set_textarea_content("");
        self.history_idx = None;
        self.draft.clear();
    }

    pub fn insert_str(&mut self, text: &str) {
        self.history_idx = None;
        self.textarea.insert_str(text);
    }

    fn set_textarea_content(&mut self, content: &str) {
        self.textarea.select_all();
        self.textarea.cut();
        self.textarea.insert_str(content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_with_history(entries: &[&str]) -> InputWidget<'static> {
        let mut input = InputWidget::new();
        for entry in entries {
            input.add_to_history(entry.to_string());
        }
        input
    }

    #[test]
    fn test_submit_returns_content_and_clears() {
        let mut input = InputWidget::new();
        input.insert_str("Bonjour le monde");
        assert_eq!(input.submit(), "Bonjour le monde");
        assert!(input.is_empty());
        assert!(input.history_up());
        assert_eq!(input.get_content(), "Bonjour le monde");
    }

    #[test]
    fn test_multiline_content_joins_with_newline() {
        let mut input = InputWidget::new();
        input.insert_str("first");
        input.textarea_mut().insert_newline();
        input.insert_str("second");
        assert_eq!(input.get_content(), "first\nsecond");
    }

    #[test]
    fn test_history_navigation_restores_draft() {
        let mut input = widget_with_history(&["one", "two"]);
        input.insert_str("draft");

        assert!(input.history_up());
        assert_eq!(input.get_content(), "two");
        assert!(input.history_up());
        assert_eq!(input.get_content(), "one");
        assert!(!input.history_up());

        assert!(input.history_down());
        assert_eq!(input.get_content(), "two");
        assert!(input.history_down());
        assert_eq!(input.get_content(), "draft");
        assert!(!input.is_in_history_mode());
        assert!(!input.history_down());
    }

    #[test]
    fn test_history_skips_blank_and_repeated_entries() {
        let mut input = widget_with_history(&["same", "same", "   "]);
        assert!(input.history_up());
        assert_eq!(input.get_content(), "same");
        assert!(!input.history_up());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut input = InputWidget::new();
        for i in 0..MAX_HISTORY_SIZE + 10 {
            input.add_to_history(format!("entry {}", i));
        }
        assert_eq!(input.history.len(), MAX_HISTORY_SIZE);
        assert_eq!(input.history.front().map(String::as_str), Some("entry 10"));
    }
}
