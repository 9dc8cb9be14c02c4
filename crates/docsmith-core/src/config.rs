//! Generation settings (`docsmith.toml`) parsing and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reference::Classifier;
use crate::registry::Registry;

/// Conventional config file name.
pub const CONFIG_FILE: &str = "docsmith.toml";

/// Errors that can occur when loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid base-path '{0}': must start and end with '/'")]
    InvalidBasePath(String),

    #[error("plain-text-sentinel must not be empty")]
    EmptySentinel,

    #[error("batch threads must be at least 1")]
    ZeroThreads,
}

/// The complete docsmith.toml file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocConfig {
    /// Cross-reference resolution settings.
    #[serde(default)]
    pub references: ReferenceConfig,

    /// Parallel batch settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// `[references]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ReferenceConfig {
    /// Prefix of absolute documentation paths.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Whether private entities can be linked to.
    #[serde(default = "default_true")]
    pub include_private: bool,

    /// Name that marks a see tag as plain text.
    #[serde(default = "default_sentinel")]
    pub plain_text_sentinel: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            include_private: true,
            plain_text_sentinel: default_sentinel(),
        }
    }
}

impl ReferenceConfig {
    /// Apply the visibility setting to a registry snapshot
    pub fn visible_registry(&self, registry: Registry) -> Registry {
        registry.retain_visible(self.include_private)
    }

    /// Classifier using the configured sentinel
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.plain_text_sentinel.clone())
    }
}

/// `[batch]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Worker threads; the global rayon pool is used when unset.
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_base_path() -> String {
    "/".to_string()
}

fn default_sentinel() -> String {
    crate::reference::PLAIN_TEXT_SENTINEL.to_string()
}

fn default_true() -> bool {
    true
}

impl DocConfig {
    /// Load a config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a setting is out of range.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.references.base_path;
        if !base.starts_with('/') || !base.ends_with('/') {
            return Err(ConfigError::InvalidBasePath(base.clone()));
        }
        if self.references.plain_text_sentinel.trim().is_empty() {
            return Err(ConfigError::EmptySentinel);
        }
        if self.batch.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Serialize the config to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
