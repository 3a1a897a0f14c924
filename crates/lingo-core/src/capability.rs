// ABOUTME: Capability traits defining how lingo talks to the AI host
// ABOUTME: Detector is created once at probe time; translators and summarizers per request

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The three host-provided AI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Detector,
    Translator,
    Summarizer,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 3] = [
        CapabilityKind::Detector,
        CapabilityKind::Translator,
        CapabilityKind::Summarizer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Detector => "detector",
            CapabilityKind::Translator => "translator",
            CapabilityKind::Summarizer => "summarizer",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability of one capability as found at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Availability {
    #[default]
    Absent,
    Ready,
    /// Present on the host but failed to initialize
    Error(String),
}

impl Availability {
    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready)
    }
}

/// Which capabilities the host reports as present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapabilities {
    #[serde(default)]
    pub detector: bool,
    #[serde(default)]
    pub translator: bool,
    #[serde(default)]
    pub summarizer: bool,
}

impl HostCapabilities {
    pub fn all() -> Self {
        Self {
            detector: true,
            translator: true,
            summarizer: true,
        }
    }

    pub fn has(&self, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::Detector => self.detector,
            CapabilityKind::Translator => self.translator,
            CapabilityKind::Summarizer => self.summarizer,
        }
    }
}

/// One ranked language guess from the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    #[serde(rename = "detectedLanguage")]
    pub language: String,
    /// In [0, 1]
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStyle {
    #[default]
    KeyPoints,
    Tldr,
    Teaser,
    Headline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    #[default]
    PlainText,
    Markdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

pub const DEFAULT_SHARED_CONTEXT: &str =
    "This is an example of text summarization using Chrome AI APIs.";

/// Session configuration passed when creating a summarizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizerOptions {
    pub shared_context: String,
    #[serde(rename = "type")]
    pub style: SummaryStyle,
    pub format: SummaryFormat,
    pub length: SummaryLength,
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            shared_context: DEFAULT_SHARED_CONTEXT.to_string(),
            style: SummaryStyle::KeyPoints,
            format: SummaryFormat::PlainText,
            length: SummaryLength::Medium,
        }
    }
}

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Ranked guesses, most likely first.
    async fn detect(&self, text: &str) -> Result<Vec<Detection>>;
}

/// A translation session bound to one (source, target) pair.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// The host environment that owns the AI models.
#[async_trait]
pub trait CapabilityHost: Send + Sync {
    /// Short name for logs and the doctor command
    fn name(&self) -> &'static str;

    /// Report which capabilities exist. `Err` means the host has no AI support at all.
    async fn capabilities(&self) -> Result<HostCapabilities>;

    async fn create_detector(&self) -> Result<Arc<dyn LanguageDetector>>;

    async fn create_translator(&self, source: &str, target: &str) -> Result<Box<dyn Translator>>;

    async fn create_summarizer(&self, options: &SummarizerOptions) -> Result<Box<dyn Summarizer>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizer_options_serialize_with_host_field_names() {
        let json = serde_json::to_value(SummarizerOptions::default()).unwrap();
        assert_eq!(json["type"], "key-points");
        assert_eq!(json["format"], "plain-text");
        assert_eq!(json["length"], "medium");
        assert_eq!(json["sharedContext"], DEFAULT_SHARED_CONTEXT);
    }

    #[test]
    fn detection_parses_host_shape() {
        let d: Detection =
            serde_json::from_str(r#"{"detectedLanguage":"fr","confidence":0.97}"#).unwrap();
        assert_eq!(d.language, "fr");
        assert_eq!(d.confidence, 0.97);
    }

    #[test]
    fn missing_capabilities_default_to_absent() {
        let caps: HostCapabilities = serde_json::from_str(r#"{"translator":true}"#).unwrap();
        assert!(caps.has(CapabilityKind::Translator));
        assert!(!caps.has(CapabilityKind::Detector));
        assert!(!caps.has(CapabilityKind::Summarizer));
    }

    #[test]
    fn availability_defaults_to_absent() {
        assert_eq!(Availability::default(), Availability::Absent);
        assert!(!Availability::Error("boom".into()).is_ready());
        assert!(Availability::Ready.is_ready());
    }
}
