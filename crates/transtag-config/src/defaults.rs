//! Default values.

use crate::schema::{LocalesConfig, LoggingConfig, RenderConfig};
use std::path::PathBuf;
use transtag_common::DEFAULT_DOMAIN;

/// Configuration file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "transtag.toml";

/// Locale root used when none is configured.
pub const DEFAULT_LOCALES_DIR: &str = "locales";

/// Log filter used when neither `RUST_LOG` nor the file sets one.
pub const DEFAULT_LOG_FILTER: &str = "transtag=info";

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_LOCALES_DIR),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            language: String::new(),
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            directory: None,
        }
    }
}
