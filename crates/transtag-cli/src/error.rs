//! Application-wide error types using thiserror.

use std::path::PathBuf;
use transtag_common::TransError;
use transtag_i18n::I18nError;
use transtag_template::TemplateError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded, validated or saved.
    #[error("Configuration error: {0}")]
    Config(#[from] TransError),

    /// The locale table could not be built.
    #[error("Catalog error: {0}")]
    Catalog(#[from] I18nError),

    /// A template failed to compile or render.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Reading a template or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `--var` argument without `=`.
    #[error("Invalid variable '{0}', expected KEY=VALUE")]
    InvalidVar(String),

    /// `init` would overwrite an existing file.
    #[error("Configuration file {} already exists, use --force to overwrite", .0.display())]
    AlreadyExists(PathBuf),

    /// The global subscriber could not be installed.
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

/// Result type for the command line tool.
pub type CliResult<T> = Result<T, CliError>;
