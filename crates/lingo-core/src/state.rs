// ABOUTME: Application state and its transitions (model-update-view).
// ABOUTME: User intents return Commands to dispatch; task results come back as Updates.

use crate::capability::{CapabilityKind, Detection, SummarizerOptions};
use crate::dispatch::TaskKey;
use crate::language::{
    confidence_percent, IsoLanguageNames, LanguageNames, FALLBACK_SOURCE_LANGUAGE,
    SUMMARY_LANGUAGE,
};
use crate::message::{Message, MessageId};
use crate::probe::{ProbeReport, Readiness};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;

/// Messages must be strictly longer than this (in UTF-16 code units) to be summarized.
pub const MIN_SUMMARY_LENGTH: usize = 150;

/// Oldest errors are dropped past this many entries.
pub const ERROR_LOG_CAPACITY: usize = 32;

/// Knobs for how messages are processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingSettings {
    pub summarizer: SummarizerOptions,
    pub summary_min_length: usize,
    pub summary_language: String,
    pub fallback_source: String,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            summarizer: SummarizerOptions::default(),
            summary_min_length: MIN_SUMMARY_LENGTH,
            summary_language: SUMMARY_LANGUAGE.to_string(),
            fallback_source: FALLBACK_SOURCE_LANGUAGE.to_string(),
        }
    }
}

/// Work the dispatcher should start on behalf of a message
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Detect {
        id: MessageId,
        text: String,
    },
    Summarize {
        id: MessageId,
        text: String,
        options: SummarizerOptions,
    },
    Translate {
        id: MessageId,
        text: String,
        source: String,
        target: String,
    },
}

impl Command {
    pub fn key(&self) -> TaskKey {
        let (message, capability) = match self {
            Command::Detect { id, .. } => (*id, CapabilityKind::Detector),
            Command::Summarize { id, .. } => (*id, CapabilityKind::Summarizer),
            Command::Translate { id, .. } => (*id, CapabilityKind::Translator),
        };
        TaskKey {
            message,
            capability,
        }
    }
}

/// Result of a finished (or cancelled) capability task
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Detected {
        id: MessageId,
        detection: Detection,
    },
    DetectionFailed {
        id: MessageId,
        reason: String,
    },
    Summarized {
        id: MessageId,
        summary: String,
    },
    SummaryFailed {
        id: MessageId,
        reason: String,
    },
    Translated {
        id: MessageId,
        target: String,
        translation: String,
    },
    TranslationFailed {
        id: MessageId,
        target: String,
        reason: String,
    },
    Cancelled {
        id: MessageId,
        capability: CapabilityKind,
    },
}

/// Outcome of sending non-empty input
#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    pub id: MessageId,
    /// Detection to dispatch; `None` when the detector isn't ready
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Ordered message list plus capability readiness and the error log
pub struct AppState {
    messages: Vec<Message>,
    readiness: Readiness,
    errors: VecDeque<ErrorEntry>,
    next_id: u64,
    settings: ProcessingSettings,
    names: Arc<dyn LanguageNames>,
}

impl AppState {
    pub fn new(readiness: Readiness) -> Self {
        Self::with_settings(readiness, ProcessingSettings::default())
    }

    pub fn with_settings(readiness: Readiness, settings: ProcessingSettings) -> Self {
        Self {
            messages: vec![],
            readiness,
            errors: VecDeque::new(),
            next_id: 1,
            settings,
            names: Arc::new(IsoLanguageNames),
        }
    }

    /// Build from a probe result, surfacing any probe errors.
    pub fn from_probe(report: &ProbeReport, settings: ProcessingSettings) -> Self {
        let mut state = Self::with_settings(report.readiness.clone(), settings);
        for error in &report.errors {
            state.report_error(error.clone());
        }
        state
    }

    pub fn with_language_names(mut self, names: Arc<dyn LanguageNames>) -> Self {
        self.names = names;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn settings(&self) -> &ProcessingSettings {
        &self.settings
    }

    /// Human-readable name for a language code
    pub fn language_name(&self, code: &str) -> String {
        self.names.display_name(code)
    }

    /// Most recent error, shown in the banner
    pub fn latest_error(&self) -> Option<&ErrorEntry> {
        self.errors.back()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.errors.iter()
    }

    pub fn dismiss_errors(&mut self) {
        self.errors.clear();
    }

    /// Log an error and record it for display.
    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.errors.push_back(ErrorEntry {
            message,
            at: Utc::now(),
        });
        while self.errors.len() > ERROR_LOG_CAPACITY {
            self.errors.pop_front();
        }
    }

    /// True when no message has a capability call outstanding
    pub fn is_idle(&self) -> bool {
        !self.messages.iter().any(Message::is_busy)
    }

    /// Append a message for `input`. Whitespace-only input changes nothing.
    pub fn send(&mut self, input: &str) -> Option<SendOutcome> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        let id = MessageId(self.next_id);
        self.next_id += 1;

        let mut message = Message::new(id, text.to_string());
        let command = if self.readiness.detector.is_ready() {
            Some(Command::Detect {
                id,
                text: message.text.clone(),
            })
        } else {
            message.is_processing = false;
            None
        };
        tracing::debug!(%id, len = message.text_len(), "Appended message");
        self.messages.push(message);

        Some(SendOutcome { id, command })
    }

    /// Whether the summarize action should be offered for this message.
    pub fn can_summarize(&self, id: MessageId) -> bool {
        let Some(msg) = self.message(id) else {
            return false;
        };
        self.readiness.summarizer.is_ready()
            && msg.detected_language.as_deref() == Some(self.settings.summary_language.as_str())
            && msg.text_len() > self.settings.summary_min_length
            && msg.summary.is_none()
    }

    /// Whether the translate action should be offered at all.
    pub fn can_translate(&self) -> bool {
        self.readiness.translator.is_ready()
    }

    /// Mark the message summarizing. `None` for unknown ids or a summary already in flight.
    pub fn request_summary(&mut self, id: MessageId) -> Option<Command> {
        let options = self.settings.summarizer.clone();
        let msg = self.message_mut(id)?;
        if msg.is_summarizing {
            return None;
        }
        msg.is_summarizing = true;
        msg.summary_error = false;
        Some(Command::Summarize {
            id,
            text: msg.text.clone(),
            options,
        })
    }

    /// Mark the message translating to `target`. `None` for unknown ids or a translation in flight.
    pub fn request_translation(&mut self, id: MessageId, target: &str) -> Option<Command> {
        let fallback = self.settings.fallback_source.clone();
        let msg = self.message_mut(id)?;
        if msg.is_translating {
            return None;
        }
        msg.is_translating = true;
        msg.translation_error = false;
        msg.target_language = Some(target.to_string());
        Some(Command::Translate {
            id,
            text: msg.text.clone(),
            source: msg.detected_language.clone().unwrap_or(fallback),
            target: target.to_string(),
        })
    }

    /// Apply a task result to the message it belongs to.
    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Detected { id, detection } => {
                let name = self.names.display_name(&detection.language);
                if let Some(msg) = self.message_mut(id) {
                    msg.is_processing = false;
                    msg.confidence = Some(confidence_percent(detection.confidence));
                    msg.detected_language = Some(detection.language);
                    msg.language_name = Some(name);
                }
            }
            Update::DetectionFailed { id, reason } => {
                if let Some(msg) = self.message_mut(id) {
                    msg.is_processing = false;
                    msg.has_error = true;
                }
                self.report_error(format!("Error processing message: {}", reason));
            }
            Update::Summarized { id, summary } => {
                if let Some(msg) = self.message_mut(id) {
                    msg.is_summarizing = false;
                    if msg.summary.is_none() {
                        msg.summary = Some(summary);
                    } else {
                        tracing::debug!(%id, "Ignoring second summary");
                    }
                }
            }
            Update::SummaryFailed { id, reason } => {
                if let Some(msg) = self.message_mut(id) {
                    msg.is_summarizing = false;
                    msg.summary_error = true;
                }
                self.report_error(format!("Error summarizing text: {}", reason));
            }
            Update::Translated {
                id,
                target,
                translation,
            } => {
                if let Some(msg) = self.message_mut(id) {
                    msg.is_translating = false;
                    msg.translations.insert(target, translation);
                }
            }
            Update::TranslationFailed { id, target, reason } => {
                if let Some(msg) = self.message_mut(id) {
                    msg.is_translating = false;
                    msg.translation_error = true;
                }
                tracing::debug!(%id, %target, "Translation failed");
                self.report_error(format!("Error translating text: {}", reason));
            }
            Update::Cancelled { id, capability } => {
                if let Some(msg) = self.message_mut(id) {
                    match capability {
                        CapabilityKind::Detector => msg.is_processing = false,
                        CapabilityKind::Summarizer => msg.is_summarizing = false,
                        CapabilityKind::Translator => msg.is_translating = false,
                    }
                }
            }
        }
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        let found = self.messages.iter_mut().find(|m| m.id == id);
        if found.is_none() {
            tracing::warn!(%id, "No message with this id");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Availability;

    fn detection(language: &str, confidence: f64) -> Detection {
        Detection {
            language: language.to_string(),
            confidence,
        }
    }

    fn detected_state(text: &str, language: &str) -> (AppState, MessageId) {
        let mut state = AppState::new(Readiness::all_ready());
        let id = state.send(text).unwrap().id;
        state.apply(Update::Detected {
            id,
            detection: detection(language, 0.9),
        });
        (state, id)
    }

    #[test]
    fn send_appends_one_message_with_unique_ids() {
        let mut state = AppState::new(Readiness::all_ready());
        let a = state.send("first").unwrap();
        let b = state.send("  second  ").unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id < b.id);
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.messages()[1].text, "second");
    }

    #[test]
    fn send_ignores_blank_input() {
        let mut state = AppState::new(Readiness::all_ready());
        assert!(state.send("").is_none());
        assert!(state.send("   \n\t ").is_none());
        assert!(state.messages().is_empty());
    }

    #[test]
    fn send_dispatches_detection_when_ready() {
        let mut state = AppState::new(Readiness::all_ready());
        let outcome = state.send("Bonjour le monde").unwrap();
        assert_eq!(
            outcome.command,
            Some(Command::Detect {
                id: outcome.id,
                text: "Bonjour le monde".to_string()
            })
        );
        assert!(state.message(outcome.id).unwrap().is_processing);
    }

    #[test]
    fn send_without_detector_finishes_immediately() {
        let mut state = AppState::new(Readiness::default());
        let outcome = state.send("hello").unwrap();
        assert!(outcome.command.is_none());
        let msg = state.message(outcome.id).unwrap();
        assert!(!msg.is_processing);
        assert!(msg.detected_language.is_none());
        assert!(msg.language_name.is_none());
        assert!(msg.confidence.is_none());
        assert!(!msg.has_error);
    }

    #[test]
    fn detection_records_language_and_rounded_confidence() {
        let mut state = AppState::new(Readiness::all_ready());
        let id = state.send("Bonjour le monde").unwrap().id;
        state.apply(Update::Detected {
            id,
            detection: detection("fr", 0.97),
        });
        let msg = state.message(id).unwrap();
        assert!(!msg.is_processing);
        assert_eq!(msg.detected_language.as_deref(), Some("fr"));
        assert_eq!(msg.language_name.as_deref(), Some("French"));
        assert_eq!(msg.confidence, Some(97.0));
        assert_eq!(
            msg.confidence_label().as_deref(),
            Some("97.0% sure this is French")
        );
    }

    #[test]
    fn detection_failure_marks_the_originating_message() {
        let mut state = AppState::new(Readiness::all_ready());
        let first = state.send("first").unwrap().id;
        let second = state.send("second").unwrap().id;
        state.apply(Update::DetectionFailed {
            id: first,
            reason: "model crashed".to_string(),
        });
        assert!(state.message(first).unwrap().has_error);
        assert!(!state.message(first).unwrap().is_processing);
        assert!(!state.message(second).unwrap().has_error);
        assert!(state.message(second).unwrap().is_processing);
        assert_eq!(
            state.latest_error().unwrap().message,
            "Error processing message: model crashed"
        );
    }

    #[test]
    fn summarize_eligibility_boundary() {
        let (state, id) = detected_state(&"a".repeat(150), "en");
        assert!(!state.can_summarize(id));

        let (state, id) = detected_state(&"a".repeat(151), "en");
        assert!(state.can_summarize(id));
    }

    #[test]
    fn summarize_eligibility_counts_astral_characters_twice() {
        let (state, id) = detected_state(&"🌍".repeat(75), "en");
        assert!(!state.can_summarize(id));

        let (state, id) = detected_state(&"🌍".repeat(76), "en");
        assert!(state.can_summarize(id));
    }

    #[test]
    fn summarize_requires_english_and_ready_summarizer() {
        let (state, id) = detected_state(&"a".repeat(200), "fr");
        assert!(!state.can_summarize(id));

        let mut readiness = Readiness::all_ready();
        readiness.summarizer = Availability::Absent;
        let mut state = AppState::new(readiness);
        let id = state.send(&"a".repeat(200)).unwrap().id;
        state.apply(Update::Detected {
            id,
            detection: detection("en", 0.9),
        });
        assert!(!state.can_summarize(id));
    }

    #[test]
    fn summarize_is_terminal_once_a_summary_exists() {
        let (mut state, id) = detected_state(&"a".repeat(200), "en");
        let command = state.request_summary(id).unwrap();
        assert!(matches!(command, Command::Summarize { .. }));
        assert!(state.message(id).unwrap().is_summarizing);
        assert!(state.request_summary(id).is_none(), "already in flight");

        state.apply(Update::Summarized {
            id,
            summary: "short".to_string(),
        });
        let msg = state.message(id).unwrap();
        assert!(!msg.is_summarizing);
        assert_eq!(msg.summary.as_deref(), Some("short"));
        assert!(!state.can_summarize(id));
    }

    #[test]
    fn summary_failure_allows_retry() {
        let (mut state, id) = detected_state(&"a".repeat(200), "en");
        state.request_summary(id).unwrap();
        state.apply(Update::SummaryFailed {
            id,
            reason: "timeout".to_string(),
        });
        assert!(state.message(id).unwrap().summary_error);
        assert!(state.can_summarize(id));

        state.request_summary(id).unwrap();
        let msg = state.message(id).unwrap();
        assert!(msg.is_summarizing);
        assert!(!msg.summary_error);
    }

    #[test]
    fn translate_uses_detected_language_as_source() {
        let (mut state, id) = detected_state("Bonjour le monde", "fr");
        let command = state.request_translation(id, "en").unwrap();
        match command {
            Command::Translate { source, target, .. } => {
                assert_eq!(source, "fr");
                assert_eq!(target, "en");
            }
            other => panic!("unexpected command {:?}", other),
        }
        let msg = state.message(id).unwrap();
        assert!(msg.is_translating);
        assert_eq!(msg.target_language.as_deref(), Some("en"));
    }

    #[test]
    fn translate_falls_back_to_english_source() {
        let mut state = AppState::new(Readiness::default());
        let id = state.send("hello").unwrap().id;
        match state.request_translation(id, "es").unwrap() {
            Command::Translate { source, .. } => assert_eq!(source, "en"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn translations_accumulate_per_target() {
        let (mut state, id) = detected_state("Bonjour le monde", "fr");
        state.request_translation(id, "en").unwrap();
        state.apply(Update::Translated {
            id,
            target: "en".to_string(),
            translation: "Hello world".to_string(),
        });
        state.request_translation(id, "es").unwrap();
        state.apply(Update::Translated {
            id,
            target: "es".to_string(),
            translation: "Hola mundo".to_string(),
        });

        let msg = state.message(id).unwrap();
        assert!(!msg.is_translating);
        assert_eq!(msg.translations.len(), 2);
        assert_eq!(msg.translations["en"], "Hello world");
        assert_eq!(msg.translations["es"], "Hola mundo");
    }

    #[test]
    fn translation_failure_sets_flag_and_keeps_prior_translations() {
        let (mut state, id) = detected_state("Bonjour", "fr");
        state.request_translation(id, "en").unwrap();
        state.apply(Update::Translated {
            id,
            target: "en".to_string(),
            translation: "Hello".to_string(),
        });
        state.request_translation(id, "ru").unwrap();
        state.apply(Update::TranslationFailed {
            id,
            target: "ru".to_string(),
            reason: "unsupported pair".to_string(),
        });
        let msg = state.message(id).unwrap();
        assert!(msg.translation_error);
        assert!(!msg.is_translating);
        assert_eq!(msg.translations.len(), 1);
        assert_eq!(
            state.latest_error().unwrap().message,
            "Error translating text: unsupported pair"
        );
    }

    #[test]
    fn cancel_clears_flag_without_error() {
        let (mut state, id) = detected_state("Bonjour", "fr");
        state.request_translation(id, "en").unwrap();
        state.apply(Update::Cancelled {
            id,
            capability: CapabilityKind::Translator,
        });
        let msg = state.message(id).unwrap();
        assert!(!msg.is_translating);
        assert!(!msg.translation_error);
        assert!(state.latest_error().is_none());
    }

    #[test]
    fn updates_never_reorder_messages() {
        let mut state = AppState::new(Readiness::all_ready());
        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|t| state.send(t).unwrap().id)
            .collect();
        state.apply(Update::Detected {
            id: ids[1],
            detection: detection("en", 0.5),
        });
        let order: Vec<_> = state.messages().iter().map(|m| m.id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn error_log_is_bounded_and_newest_last() {
        let mut state = AppState::new(Readiness::default());
        for i in 0..(ERROR_LOG_CAPACITY + 5) {
            state.report_error(format!("error {}", i));
        }
        assert_eq!(state.errors().count(), ERROR_LOG_CAPACITY);
        assert_eq!(
            state.latest_error().unwrap().message,
            format!("error {}", ERROR_LOG_CAPACITY + 4)
        );
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut state = AppState::new(Readiness::all_ready());
        assert!(state.request_summary(MessageId(99)).is_none());
        state.apply(Update::Summarized {
            id: MessageId(99),
            summary: "x".to_string(),
        });
        assert!(state.messages().is_empty());
    }
}
