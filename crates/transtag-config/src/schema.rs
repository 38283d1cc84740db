//! Configuration schema definitions using serde.

use crate::validator::ConfigValidator;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use transtag_common::Result;

/// Main configuration structure for transtag.
///
/// Every section and field is optional in the file; missing values take
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the language catalogs live.
    pub locales: LocalesConfig,
    /// Defaults applied when rendering a template.
    pub render: RenderConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Locale table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalesConfig {
    /// Root directory holding one subdirectory per language code.
    pub dir: PathBuf,
}

/// Render defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Language bound to `_language`; empty leaves text untranslated.
    pub language: String,
    /// Domain bound to `_domain`.
    pub domain: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Write daily rolling log files here instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate(self)
    }
}
