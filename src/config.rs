//! Catalogue configuration.
//!
//! Selects the language templates are served in, the directory holding
//! stored localized variants, and the mean score a context needs to pass
//! `score_context`. Values come from defaults, environment variables or a
//! YAML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompts::{is_valid_language, DEFAULT_LANGUAGE};
use crate::schema::{ContextScoring, DEFAULT_CONTEXT_SCORE_THRESHOLD};

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable or file field has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration for building a [`Catalogue`](crate::catalogue::Catalogue).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Language templates are served in.
    pub language: String,
    /// Root of the stored variants, laid out as `<cache_dir>/<language>/<name>.json`.
    pub cache_dir: Option<PathBuf>,
    /// Minimum mean context score for [`CatalogueConfig::keeps_context`].
    pub context_score_threshold: f64,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            cache_dir: None,
            context_score_threshold: DEFAULT_CONTEXT_SCORE_THRESHOLD,
        }
    }
}

impl CatalogueConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `QA_FORGE_LANGUAGE`: Template language (default: spanish)
    /// - `QA_FORGE_CACHE_DIR`: Directory of stored variants (default: none)
    /// - `QA_FORGE_SCORE_THRESHOLD`: Minimum mean context score (default: 1.5)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(val) = var("QA_FORGE_LANGUAGE") {
            config.language = val.trim().to_string();
        }

        if let Some(val) = var("QA_FORGE_CACHE_DIR") {
            if !val.trim().is_empty() {
                config.cache_dir = Some(PathBuf::from(val.trim()));
            }
        }

        if let Some(val) = var("QA_FORGE_SCORE_THRESHOLD") {
            config.context_score_threshold =
                parse_env_value(val.trim(), "QA_FORGE_SCORE_THRESHOLD")?;
        }

        Ok(config)
    }

    /// Reads a configuration from a YAML file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "language cannot be empty".to_string(),
            ));
        }

        if !is_valid_language(&self.language) {
            return Err(ConfigError::ValidationFailed(format!(
                "language must be lowercase ASCII letters, got '{}'",
                self.language
            )));
        }

        if let Some(dir) = &self.cache_dir {
            if dir.is_file() {
                return Err(ConfigError::ValidationFailed(format!(
                    "cache_dir {} is a file",
                    dir.display()
                )));
            }
        }

        if !(1.0..=3.0).contains(&self.context_score_threshold) {
            return Err(ConfigError::ValidationFailed(
                "context_score_threshold must be between 1.0 and 3.0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_context_score_threshold(mut self, threshold: f64) -> Self {
        self.context_score_threshold = threshold;
        self
    }

    /// Whether a context scored by `score_context` reaches the configured
    /// threshold and should be kept for question generation.
    pub fn keeps_context(&self, scoring: &ContextScoring) -> bool {
        scoring.passes(self.context_score_threshold)
    }
}

/// Parse an environment variable value into a type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}
