use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub use crate::config::language::{Dialect, EXECUTABLE_TAGS, FileExtension, Language};
use crate::types::ExecutionLimits;

pub mod language;
mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../codepad.example.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid characters in file extension")]
    InvalidFileExtChars,

    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("language '{0}' not found in configuration")]
    LanguageNotFound(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for Codepad
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Default limits applied to all executions.
    /// Per-request limits override individual fields.
    #[serde(default)]
    pub default_limits: ExecutionLimits,

    /// Language catalog keyed by language tag
    #[serde(default)]
    pub languages: HashMap<String, Language>,
}

impl Config {
    /// Create a new config with the embedded language catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty config with no languages
    pub fn empty() -> Self {
        Self {
            default_limits: ExecutionLimits::default(),
            languages: HashMap::new(),
        }
    }

    /// Get a language by tag
    pub fn get_language(&self, tag: &str) -> Result<&Language, ConfigError> {
        self.languages
            .get(tag)
            .ok_or_else(|| ConfigError::LanguageNotFound(tag.to_string()))
    }

    /// Find the language claiming a file extension
    pub fn language_for_extension(&self, extension: &str) -> Option<(&str, &Language)> {
        let mut matches: Vec<_> = self
            .languages
            .iter()
            .filter(|(_, lang)| lang.has_extension(extension))
            .collect();
        matches.sort_by_key(|(tag, _)| *tag);
        matches
            .into_iter()
            .next()
            .map(|(tag, lang)| (tag.as_str(), lang))
    }

    /// Merge execution limits with defaults
    pub fn effective_limits(&self, overrides: Option<&ExecutionLimits>) -> ExecutionLimits {
        match overrides {
            Some(limits) => self.default_limits.with_overrides(limits),
            None => self.default_limits.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded default config should be valid")
    }
}
