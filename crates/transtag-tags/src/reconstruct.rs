//! Source text reconstruction for directive bodies.
//!
//! A block body is read as tokens, but what gets translated is the text the
//! author wrote. [`TextReconstructor`] joins the raw lexemes back together and
//! restores the spaces the lexer dropped inside markers, so
//! `{{ name }}` and `{{name}}` come back exactly as written.

use transtag_template::{Token, TokenKind};

/// Joins tokens back into source text.
///
/// Tracks where the previous token ended. When a marker token (anything but
/// [`TokenKind::Text`]) starts on that same line at a later column, the gap
/// is filled with one space per column.
#[derive(Debug, Default)]
pub struct TextReconstructor {
    text: String,
    prev_end: Option<(usize, usize)>,
}

impl TextReconstructor {
    /// Start with empty text
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next token
    pub fn push(&mut self, token: &Token) {
        if token.kind != TokenKind::Text {
            if let Some((line, col)) = self.prev_end {
                if token.line == line && token.col > col {
                    self.text.extend(std::iter::repeat(' ').take(token.col - col));
                }
            }
        }
        self.text.push_str(&token.raw);
        self.prev_end = Some(token.end());
    }

    /// The text so far, without consuming the reconstructor
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The reconstructed text
    pub fn finish(self) -> String {
        self.text
    }
}
