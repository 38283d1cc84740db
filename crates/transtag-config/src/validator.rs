//! Semantic validation of a loaded configuration.

use crate::schema::Config;
use transtag_common::{Result, TransError};
use unic_langid::LanguageIdentifier;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    ///
    /// An empty render language is allowed and means "no translation".
    pub fn validate(config: &Config) -> Result<()> {
        if config.locales.dir.as_os_str().is_empty() {
            return Err(TransError::Config("Locales directory cannot be empty".to_string()));
        }

        if config.render.domain.is_empty() {
            return Err(TransError::Config("Render domain cannot be empty".to_string()));
        }

        Self::validate_language(&config.render.language)?;

        if config.logging.filter.trim().is_empty() {
            return Err(TransError::Config("Logging filter cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Accepts an empty code or anything that parses as a language identifier,
    /// with either `_` or `-` between subtags. A POSIX codeset or modifier
    /// suffix (`sv_SE.UTF-8`, `de_DE@euro`) is allowed, matching locale
    /// directory names.
    pub fn validate_language(code: &str) -> Result<()> {
        let tag = code.split(['.', '@']).next().unwrap_or_default();
        if code.is_empty() || tag.parse::<LanguageIdentifier>().is_ok() {
            Ok(())
        } else {
            Err(TransError::Config(format!("Invalid language code '{code}'")))
        }
    }
}
