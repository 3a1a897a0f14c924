// ABOUTME: Terminal application state and event handling.
// ABOUTME: Keys become core commands; task completions are applied back to the state.

use crate::error::Result;
use crate::tui::event::TuiEvent;
use crate::tui::Tui;
use crate::widgets::input::InputWidget;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lingo_core::{
    AppState, Command, Completion, Dispatcher, MessageId, TargetLanguage, TARGET_LANGUAGES,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::StreamExt;

const DOUBLE_CTRL_C: Duration = Duration::from_millis(500);

/// Which pane receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Messages,
}

/// Actions that need the dispatcher (returned from handle_key)
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Dispatch(Command),
    Cancel(MessageId),
}

pub struct App {
    pub state: AppState,
    pub input: InputWidget<'static>,
    pub focus: Focus,
    /// Index into the message list while the list has focus
    pub selected: Option<usize>,
    /// Lines scrolled up from the bottom of the conversation
    pub scroll_offset: usize,
    pub last_ctrl_c: Option<Instant>,
    pub throbber_frame: usize,
    targets: HashMap<MessageId, usize>,
    default_target: usize,
}

impl App {
    pub fn new(state: AppState, default_target: usize) -> Self {
        let mut input = InputWidget::new();
        input.set_focused(true);
        Self {
            state,
            input,
            focus: Focus::Input,
            selected: None,
            scroll_offset: 0,
            last_ctrl_c: None,
            throbber_frame: 0,
            targets: HashMap::new(),
            default_target: default_target.min(TARGET_LANGUAGES.len() - 1),
        }
    }

    pub async fn run(
        &mut self,
        tui: &mut Tui,
        dispatcher: &mut Dispatcher,
        completions: &mut UnboundedReceiver<Completion>,
    ) -> Result<()> {
        let mut tui_events = tui.event_stream();

        loop {
            tui.terminal_mut()
                .draw(|frame| crate::ui::render(frame, self))?;

            tokio::select! {
                Some(completion) = completions.recv() => {
                    if let Some(update) = dispatcher.accept(completion) {
                        self.state.apply(update);
                    }
                }
                Some(event) = tui_events.next() => {
                    match self.handle_event(event) {
                        Some(Action::Quit) => break,
                        Some(Action::Dispatch(command)) => dispatcher.dispatch(command),
                        Some(Action::Cancel(id)) => {
                            for update in dispatcher.cancel_message(id) {
                                self.state.apply(update);
                            }
                        }
                        None => {}
                    }
                }
                else => break,
            }
        }

        tracing::info!(in_flight = dispatcher.in_flight(), "Leaving TUI");
        Ok(())
    }

    pub fn handle_event(&mut self, event: TuiEvent) -> Option<Action> {
        match event {
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Paste(text) => {
                self.set_focus(Focus::Input);
                self.input.insert_str(&text);
                None
            }
            TuiEvent::Tick => {
                self.tick();
                None
            }
            TuiEvent::Resize(_, _) => None,
        }
    }

    /// Advance throbber animation
    pub fn tick(&mut self) {
        self.throbber_frame = (self.throbber_frame + 1) % 8;
    }

    pub fn throbber_char(&self) -> char {
        const THROBBER: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];
        THROBBER[self.throbber_frame]
    }

    pub fn show_ctrl_c_hint(&self) -> bool {
        self.last_ctrl_c
            .map(|t| t.elapsed() < DOUBLE_CTRL_C)
            .unwrap_or(false)
    }

    /// Translation target currently chosen for a message
    pub fn target_for(&self, id: MessageId) -> &'static TargetLanguage {
        let idx = self.targets.get(&id).copied().unwrap_or(self.default_target);
        &TARGET_LANGUAGES[idx]
    }

    pub fn selected_id(&self) -> Option<MessageId> {
        self.selected
            .and_then(|i| self.state.messages().get(i))
            .map(|m| m.id)
    }

    /// Handle a key event, returning an action if needed
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Action::Quit);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.show_ctrl_c_hint() {
                    return Some(Action::Quit);
                }
                self.last_ctrl_c = Some(Instant::now());
                return None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match self.focus {
                    Focus::Input => Focus::Messages,
                    Focus::Messages => Focus::Input,
                };
                self.set_focus(next);
                return None;
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                return None;
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Messages => self.handle_messages_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.input.textarea_mut().insert_newline();
            }
            KeyCode::Enter => return self.send(),
            KeyCode::Esc => self.state.dismiss_errors(),
            KeyCode::Up if self.input.is_empty() || self.input.is_in_history_mode() => {
                self.input.history_up();
            }
            KeyCode::Down if self.input.is_in_history_mode() => {
                self.input.history_down();
            }
            _ => {
                self.input.textarea_mut().input(key);
            }
        }
        None
    }

    fn handle_messages_key(&mut self, key: KeyEvent) -> Option<Action> {
        let count = self.state.messages().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = match self.selected {
                    Some(i) => Some(i.saturating_sub(1)),
                    None => count.checked_sub(1),
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = match self.selected {
                    Some(i) if i + 1 < count => Some(i + 1),
                    other => other.or(count.checked_sub(1)),
                };
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle_target(-1),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_target(1),
            KeyCode::Char('s') => {
                let id = self.selected_id()?;
                if !self.state.can_summarize(id) {
                    return None;
                }
                return self.state.request_summary(id).map(Action::Dispatch);
            }
            KeyCode::Char('t') => {
                let id = self.selected_id()?;
                if !self.state.can_translate() {
                    return None;
                }
                let target = self.target_for(id).code;
                return self
                    .state
                    .request_translation(id, target)
                    .map(Action::Dispatch);
            }
            KeyCode::Char('x') => {
                let id = self.selected_id()?;
                return Some(Action::Cancel(id));
            }
            KeyCode::Esc | KeyCode::Enter => self.set_focus(Focus::Input),
            _ => {}
        }
        None
    }

    fn send(&mut self) -> Option<Action> {
        // Blank input stays in the box untouched
        if self.input.get_content().trim().is_empty() {
            return None;
        }
        let content = self.input.submit();
        let outcome = self.state.send(&content)?;
        self.scroll_offset = 0;
        outcome.command.map(Action::Dispatch)
    }

    fn cycle_target(&mut self, step: isize) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let len = TARGET_LANGUAGES.len() as isize;
        let current = self.targets.get(&id).copied().unwrap_or(self.default_target) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        self.targets.insert(id, next);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.input.set_focused(focus == Focus::Input);
        match focus {
            Focus::Messages if self.selected.is_none() => {
                self.selected = self.state.messages().len().checked_sub(1);
            }
            Focus::Input => self.selected = None,
            _ => {}
        }
    }
}
