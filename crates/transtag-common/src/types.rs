//! Common type definitions shared by the translator and the template directives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain used when a template does not select one.
pub const DEFAULT_DOMAIN: &str = "default";

/// Context variable holding the language code of a render.
pub const LANGUAGE_KEY: &str = "_language";

/// Context variable holding the translation domain of a render.
pub const DOMAIN_KEY: &str = "_domain";

/// Language and domain a translation is resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransCtx {
    /// Language code, e.g. `sv_SE`. Empty means "no language selected".
    pub language: String,
    /// Catalog domain. Empty selects [`DEFAULT_DOMAIN`].
    pub domain: String,
}

impl TransCtx {
    /// Creates a translation context for the given language and domain.
    pub fn new(language: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            domain: domain.into(),
        }
    }

    /// Returns the domain, substituting [`DEFAULT_DOMAIN`] when it is empty.
    pub fn domain_or_default(&self) -> &str {
        if self.domain.is_empty() {
            DEFAULT_DOMAIN
        } else {
            &self.domain
        }
    }
}

impl fmt::Display for TransCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.domain_or_default())
    }
}

/// A single translation lookup, built per directive execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Language and domain.
    pub ctx: TransCtx,
    /// Source text (the msgid).
    pub text: String,
    /// Plural source text, if the lookup is plural.
    pub plural_text: Option<String>,
    /// Count selecting the plural form.
    pub count: Option<i64>,
    /// Disambiguating translation context (msgctxt).
    pub context: Option<String>,
}

impl TranslationRequest {
    /// Creates a singular request for `text`.
    pub fn new(ctx: TransCtx, text: impl Into<String>) -> Self {
        Self {
            ctx,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Turns the request into a plural lookup.
    #[must_use]
    pub fn with_plural(mut self, plural_text: impl Into<String>, count: i64) -> Self {
        self.plural_text = Some(plural_text.into());
        self.count = Some(count);
        self
    }

    /// Qualifies the request with a translation context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns the plural text and count when both are present.
    pub fn plural(&self) -> Option<(&str, i64)> {
        match (&self.plural_text, self.count) {
            (Some(plural), Some(count)) => Some((plural.as_str(), count)),
            _ => None,
        }
    }
}

/// Describes a language available in the locale table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Language code as used for lookups.
    pub code: String,
    /// Human readable name, falls back to the code.
    pub name: String,
}

impl fmt::Display for LanguageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.code {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} ({})", self.code, self.name)
        }
    }
}

/// Common result type for the application.
pub type Result<T> = std::result::Result<T, TransError>;

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum TransError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
