//! Error types for locale table construction

use crate::mo_parser::MoParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the locale table
#[derive(Error, Debug)]
pub enum I18nError {
    /// The locale root or a language directory could not be listed
    #[error("Failed to read locale directory {}: {source}", path.display())]
    DirectoryRead {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A catalog file could not be read
    #[error("Failed to read catalog file {}: {source}", path.display())]
    CatalogRead {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A binary catalog is truncated or carries a bad magic number
    #[error("Invalid MO catalog {}: {source}", path.display())]
    InvalidMo {
        /// Offending path
        path: PathBuf,
        /// What was wrong with the bytes
        #[source]
        source: MoParseError,
    },
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;
