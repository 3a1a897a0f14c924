// ABOUTME: Core library for lingo: message state and AI capability plumbing
// ABOUTME: Everything the TUI and CLI share lives here; no terminal code

pub mod capability;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod language;
pub mod message;
pub mod probe;
pub mod state;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use capability::{
    Availability, CapabilityHost, CapabilityKind, Detection, HostCapabilities, LanguageDetector,
    SummarizerOptions, SummaryFormat, SummaryLength, SummaryStyle, Summarizer, Translator,
};
pub use dispatch::{Completion, Dispatcher, TaskKey};
pub use error::CapabilityError;
pub use language::{IsoLanguageNames, LanguageNames, TargetLanguage, TARGET_LANGUAGES};
pub use message::{Message, MessageId};
pub use probe::{probe, ProbeReport, Readiness};
pub use state::{AppState, Command, ErrorEntry, ProcessingSettings, SendOutcome, Update};
