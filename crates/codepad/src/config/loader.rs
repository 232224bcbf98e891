//! Configuration file loading for Codepad
//!
//! Handles loading and parsing configuration files using the config crate.

use std::path::Path;

use config::{Config as ConfigBuilder, File, FileFormat};

use crate::config::language::{Dialect, is_valid_tag};
use crate::config::{Config, ConfigError};

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (tag, lang) in &self.languages {
            if !is_valid_tag(tag) {
                return Err(ConfigError::Invalid(format!(
                    "language tag '{tag}' must match [a-z0-9_+-]+"
                )));
            }
            if lang.name.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "language '{tag}' has empty name"
                )));
            }
            if lang.dialect != Dialect::for_tag(tag) {
                return Err(ConfigError::Invalid(format!(
                    "language '{tag}' cannot use the {:?} dialect, expected {:?}",
                    lang.dialect,
                    Dialect::for_tag(tag)
                )));
            }
            if lang.extensions.iter().any(|ext| ext.is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "language '{tag}' has empty extension"
                )));
            }
        }

        if self.default_limits.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "default_limits.timeout_ms must be greater than zero".to_owned(),
            ));
        }

        Ok(())
    }
}
