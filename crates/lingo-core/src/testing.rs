// ABOUTME: In-memory capability host for tests.
// ABOUTME: Deterministic outputs, per-capability failure and hang switches, and call recording.

use crate::capability::{
    CapabilityHost, CapabilityKind, Detection, HostCapabilities, LanguageDetector,
    SummarizerOptions, Summarizer, Translator,
};
use crate::error::{CapabilityError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Calls {
    translators: Vec<(String, String)>,
    summarizers: Vec<SummarizerOptions>,
}

#[derive(Clone)]
struct Behavior {
    detections: Vec<Detection>,
    failing: HashSet<CapabilityKind>,
    hanging: HashSet<CapabilityKind>,
}

impl Behavior {
    async fn gate(&self, kind: CapabilityKind) -> Result<()> {
        if self.hanging.contains(&kind) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(&kind) {
            return Err(CapabilityError::Host {
                status: 500,
                body: format!("{} exploded", kind),
            });
        }
        Ok(())
    }
}

/// Translations come back as `[source->target] text`; summaries as `summary of N chars`.
pub struct FakeHost {
    capabilities: Option<HostCapabilities>,
    fail_detector_creation: bool,
    behavior: Behavior,
    calls: Arc<Mutex<Calls>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// Every capability present; detects English with 0.95 confidence.
    pub fn new() -> Self {
        Self {
            capabilities: Some(HostCapabilities::all()),
            fail_detector_creation: false,
            behavior: Behavior {
                detections: vec![Detection {
                    language: "en".to_string(),
                    confidence: 0.95,
                }],
                failing: HashSet::new(),
                hanging: HashSet::new(),
            },
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    /// A host with no AI surface at all.
    pub fn unsupported() -> Self {
        Self {
            capabilities: None,
            ..Self::new()
        }
    }

    pub fn without(mut self, kind: CapabilityKind) -> Self {
        if let Some(caps) = &mut self.capabilities {
            match kind {
                CapabilityKind::Detector => caps.detector = false,
                CapabilityKind::Translator => caps.translator = false,
                CapabilityKind::Summarizer => caps.summarizer = false,
            }
        }
        self
    }

    pub fn detect_as(mut self, language: &str, confidence: f64) -> Self {
        self.behavior.detections = vec![Detection {
            language: language.to_string(),
            confidence,
        }];
        self
    }

    pub fn detect_nothing(mut self) -> Self {
        self.behavior.detections.clear();
        self
    }

    pub fn failing(mut self, kind: CapabilityKind) -> Self {
        self.behavior.failing.insert(kind);
        self
    }

    /// Calls for `kind` never complete.
    pub fn hanging(mut self, kind: CapabilityKind) -> Self {
        self.behavior.hanging.insert(kind);
        self
    }

    pub fn failing_detector_creation(mut self) -> Self {
        self.fail_detector_creation = true;
        self
    }

    /// (source, target) of every translator created so far
    pub fn translator_sessions(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .map(|c| c.translators.clone())
            .unwrap_or_default()
    }

    /// Options of every summarizer created so far
    pub fn summarizer_sessions(&self) -> Vec<SummarizerOptions> {
        self.calls
            .lock()
            .map(|c| c.summarizers.clone())
            .unwrap_or_default()
    }
}

struct FakeDetector(Behavior);

#[async_trait]
impl LanguageDetector for FakeDetector {
    async fn detect(&self, _text: &str) -> Result<Vec<Detection>> {
        self.0.gate(CapabilityKind::Detector).await?;
        Ok(self.0.detections.clone())
    }
}

struct FakeTranslator {
    behavior: Behavior,
    source: String,
    target: String,
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        self.behavior.gate(CapabilityKind::Translator).await?;
        Ok(format!("[{}->{}] {}", self.source, self.target, text))
    }
}

struct FakeSummarizer(Behavior);

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.0.gate(CapabilityKind::Summarizer).await?;
        Ok(format!("summary of {} chars", text.chars().count()))
    }
}

#[async_trait]
impl CapabilityHost for FakeHost {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn capabilities(&self) -> Result<HostCapabilities> {
        self.capabilities.ok_or(CapabilityError::Unsupported)
    }

    async fn create_detector(&self) -> Result<Arc<dyn LanguageDetector>> {
        if self.fail_detector_creation {
            return Err(CapabilityError::Request("detector model missing".to_string()));
        }
        Ok(Arc::new(FakeDetector(self.behavior.clone())))
    }

    async fn create_translator(&self, source: &str, target: &str) -> Result<Box<dyn Translator>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls
                .translators
                .push((source.to_string(), target.to_string()));
        }
        Ok(Box::new(FakeTranslator {
            behavior: self.behavior.clone(),
            source: source.to_string(),
            target: target.to_string(),
        }))
    }

    async fn create_summarizer(&self, options: &SummarizerOptions) -> Result<Box<dyn Summarizer>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.summarizers.push(options.clone());
        }
        Ok(Box::new(FakeSummarizer(self.behavior.clone())))
    }
}
