// ABOUTME: Language codes offered for translation and code-to-name resolution.
// ABOUTME: Display names come from isolang behind an injectable LanguageNames trait.

use isolang::Language;

/// Language a message must be detected as before it can be summarized.
pub const SUMMARY_LANGUAGE: &str = "en";

/// Source language assumed when a message has no detection result.
pub const FALLBACK_SOURCE_LANGUAGE: &str = "en";

/// Target preselected for each message's translation selector.
pub const DEFAULT_TARGET_LANGUAGE: &str = "es";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLanguage {
    pub code: &'static str,
    pub name: &'static str,
}

pub const TARGET_LANGUAGES: &[TargetLanguage] = &[
    TargetLanguage { code: "en", name: "English" },
    TargetLanguage { code: "es", name: "Spanish" },
    TargetLanguage { code: "pt", name: "Portuguese" },
    TargetLanguage { code: "ru", name: "Russian" },
    TargetLanguage { code: "tr", name: "Turkish" },
    TargetLanguage { code: "fr", name: "French" },
];

/// Index of `code` in [`TARGET_LANGUAGES`].
pub fn target_index(code: &str) -> Option<usize> {
    TARGET_LANGUAGES.iter().position(|l| l.code == code)
}

/// Resolves a language code to a human-readable name.
///
/// Implementations must be pure: the same code always yields the same name.
pub trait LanguageNames: Send + Sync {
    fn display_name(&self, code: &str) -> String;
}

/// English names from the ISO 639 tables. Unknown codes fall back to the code itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoLanguageNames;

impl LanguageNames for IsoLanguageNames {
    fn display_name(&self, code: &str) -> String {
        // BCP 47 tags like "pt-BR" or "zh-Hant" resolve by their primary subtag
        let primary = code.split(['-', '_']).next().unwrap_or(code);
        let primary = primary.to_ascii_lowercase();

        Language::from_639_1(&primary)
            .or_else(|| Language::from_639_3(&primary))
            .map(|lang| lang.to_name().to_string())
            .unwrap_or_else(|| code.to_string())
    }
}

/// Confidence in [0, 1] as a percentage rounded to one decimal place.
pub fn confidence_percent(confidence: f64) -> f64 {
    (confidence * 1000.0).round() / 10.0
}
