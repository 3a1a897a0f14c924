// ABOUTME: The message record tracked by the conversation view.
// ABOUTME: Holds original text, per-capability in-flight flags, results, and error flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-session message identifier, assigned in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub timestamp: DateTime<Utc>,

    pub is_processing: bool,
    pub is_summarizing: bool,
    pub is_translating: bool,

    /// Most recently requested translation target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_name: Option<String>,
    /// Percentage, one decimal place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, String>,

    pub has_error: bool,
    pub summary_error: bool,
    pub translation_error: bool,
}

impl Message {
    pub fn new(id: MessageId, text: String) -> Self {
        Self {
            id,
            text,
            timestamp: Utc::now(),
            is_processing: true,
            is_summarizing: false,
            is_translating: false,
            target_language: None,
            detected_language: None,
            language_name: None,
            confidence: None,
            summary: None,
            translations: BTreeMap::new(),
            has_error: false,
            summary_error: false,
            translation_error: false,
        }
    }

    /// "97.0% sure this is French", once detection has succeeded
    pub fn confidence_label(&self) -> Option<String> {
        self.detected_language.as_ref()?;
        let name = self
            .language_name
            .as_deref()
            .or(self.detected_language.as_deref())?;
        let confidence = self.confidence.unwrap_or(0.0);
        Some(format!("{:.1}% sure this is {}", confidence, name))
    }

    /// Length in UTF-16 code units, the unit summary eligibility is measured in.
    /// Characters outside the Basic Multilingual Plane count twice.
    pub fn text_len(&self) -> usize {
        self.text.encode_utf16().count()
    }

    /// True while any capability call for this message is outstanding
    pub fn is_busy(&self) -> bool {
        self.is_processing || self.is_summarizing || self.is_translating
    }
}
