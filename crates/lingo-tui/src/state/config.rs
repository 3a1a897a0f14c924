// ABOUTME: Configuration file handling.
// ABOUTME: TOML config with env var and .env support.

use crate::error::{AppError, Result};
use lingo_core::capability::{SummaryFormat, SummaryLength, SummaryStyle, DEFAULT_SHARED_CONTEXT};
use lingo_core::language::{
    target_index, DEFAULT_TARGET_LANGUAGE, FALLBACK_SOURCE_LANGUAGE, SUMMARY_LANGUAGE,
    TARGET_LANGUAGES,
};
use lingo_core::state::MIN_SUMMARY_LENGTH;
use lingo_core::{ProcessingSettings, SummarizerOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,

    #[serde(default)]
    pub translation: TranslationConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Root URL of the inference service. Unset means no AI capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HostConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SummarizerConfig {
    #[serde(default = "default_shared_context")]
    pub shared_context: String,
    #[serde(default)]
    pub style: SummaryStyle,
    #[serde(default)]
    pub format: SummaryFormat,
    #[serde(default)]
    pub length: SummaryLength,
    /// Messages must be longer than this many UTF-16 code units
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Detected language a message needs before it can be summarized
    #[serde(default = "default_summary_language")]
    pub language: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            shared_context: default_shared_context(),
            style: SummaryStyle::default(),
            format: SummaryFormat::default(),
            length: SummaryLength::default(),
            min_length: default_min_length(),
            language: default_summary_language(),
        }
    }
}

fn default_shared_context() -> String {
    DEFAULT_SHARED_CONTEXT.to_string()
}

fn default_min_length() -> usize {
    MIN_SUMMARY_LENGTH
}

fn default_summary_language() -> String {
    SUMMARY_LANGUAGE.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Preselected target in each message's language selector
    #[serde(default = "default_target")]
    pub default_target: String,
    /// Source language used when detection produced nothing
    #[serde(default = "default_fallback_source")]
    pub fallback_source: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            default_target: default_target(),
            fallback_source: default_fallback_source(),
        }
    }
}

fn default_target() -> String {
    DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_fallback_source() -> String {
    FALLBACK_SOURCE_LANGUAGE.to_string()
}

impl Config {
    /// Load config with precedence: CLI > env > .env > file > defaults
    pub fn load(host_override: Option<&str>) -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::load_from_file()?;
        config.apply_env(|key| std::env::var(key).ok());

        if let Some(url) = host_override {
            config.host.url = Some(url.to_string());
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("LINGO_HOST_URL") {
            self.host.url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(secs) = lookup("LINGO_HOST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.host.timeout_secs = s,
                Err(_) => tracing::warn!("Ignoring invalid LINGO_HOST_TIMEOUT_SECS={}", secs),
            }
        }
        if let Some(len) = lookup("LINGO_SUMMARY_MIN_LENGTH") {
            match len.parse::<usize>() {
                Ok(n) => self.summarizer.min_length = n,
                Err(_) => tracing::warn!("Ignoring invalid LINGO_SUMMARY_MIN_LENGTH={}", len),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if target_index(&self.translation.default_target).is_none() {
            return Err(AppError::UnknownLanguage {
                code: self.translation.default_target.clone(),
                available: available_targets(),
            });
        }
        if self.host.timeout_secs == 0 {
            return Err(AppError::Config(
                "host.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Processing knobs handed to the core state
    pub fn settings(&self) -> ProcessingSettings {
        ProcessingSettings {
            summarizer: SummarizerOptions {
                shared_context: self.summarizer.shared_context.clone(),
                style: self.summarizer.style,
                format: self.summarizer.format,
                length: self.summarizer.length,
            },
            summary_min_length: self.summarizer.min_length,
            summary_language: self.summarizer.language.clone(),
            fallback_source: self.translation.fallback_source.clone(),
        }
    }

    /// Index of the default target in the selector list
    pub fn default_target_index(&self) -> usize {
        target_index(&self.translation.default_target)
            .or_else(|| target_index(DEFAULT_TARGET_LANGUAGE))
            .unwrap_or(0)
    }

    fn load_from_file() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AppError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Config("Could not find config directory".to_string()))?;
        Ok(config_dir.join("lingo").join("config.toml"))
    }
}

pub fn available_targets() -> String {
    TARGET_LANGUAGES
        .iter()
        .map(|l| format!("{} ({})", l.code, l.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_fixed_processing_values() {
        let settings = Config::default().settings();
        assert_eq!(settings, ProcessingSettings::default());
    }

    #[test]
    fn test_host_config_defaults() {
        let config = HostConfig::default();
        assert!(config.url.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::default();
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[host]
url = "http://localhost:7070"

[summarizer]
style = "tldr"
length = "short"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.host.url.as_deref(), Some("http://localhost:7070"));
        assert_eq!(config.host.timeout_secs, 30);
        assert_eq!(config.summarizer.style, SummaryStyle::Tldr);
        assert_eq!(config.summarizer.length, SummaryLength::Short);
        assert_eq!(config.summarizer.format, SummaryFormat::PlainText);
        assert_eq!(config.summarizer.min_length, 150);
        assert_eq!(config.translation.default_target, "es");
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[host\nurl = ").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("LINGO_HOST_URL", "http://ai.local:9000"),
            ("LINGO_HOST_TIMEOUT_SECS", "5"),
            ("LINGO_SUMMARY_MIN_LENGTH", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.host.url.as_deref(), Some("http://ai.local:9000"));
        assert_eq!(config.host.timeout_secs, 5);
        assert_eq!(config.summarizer.min_length, 150);
    }

    #[test]
    fn test_empty_env_url_clears_host() {
        let mut config = Config::default();
        config.host.url = Some("http://file.example".to_string());
        config.apply_env(|k| (k == "LINGO_HOST_URL").then(String::new));
        assert!(config.host.url.is_none());
    }

    #[test]
    fn test_validate_rejects_unknown_default_target() {
        let mut config = Config::default();
        config.translation.default_target = "de".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown language: de"));
    }

    #[test]
    fn test_default_target_index_points_at_spanish() {
        let config = Config::default();
        assert_eq!(TARGET_LANGUAGES[config.default_target_index()].code, "es");
    }

    #[test]
    fn test_default_config_toml_contents() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).expect("Failed to serialize config");
        assert!(toml.contains("[host]"));
        assert!(toml.contains("timeout_secs = 30"));
        assert!(toml.contains(r#"style = "key-points""#));
        assert!(toml.contains(r#"default_target = "es""#));
        assert!(!toml.contains("url ="));
    }
}
