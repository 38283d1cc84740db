//! Error types for template compilation and rendering

use std::fmt;
use thiserror::Error;

/// Errors raised while compiling or rendering a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template source could not be compiled
    #[error("[line {line}, column {col}] {message}")]
    Syntax {
        /// 1-based line of the offending token
        line: usize,
        /// 1-based column of the offending token, counted in characters
        col: usize,
        /// What went wrong
        message: String,
    },

    /// A compiled template failed while rendering
    #[error("Render error: {message}")]
    Render {
        /// What went wrong
        message: String,
    },

    /// A directive name was registered twice
    #[error("Tag '{0}' is already registered")]
    DuplicateTag(String),
}

impl TemplateError {
    /// Create a syntax error at `line`/`col`
    pub fn syntax(line: usize, col: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            col,
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Whether this error was raised at compile time
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

impl From<fmt::Error> for TemplateError {
    fn from(_: fmt::Error) -> Self {
        Self::render("failed to write template output")
    }
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;
