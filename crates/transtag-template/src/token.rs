//! Lexical tokens

use std::fmt;

/// Kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Literal template text outside any marker
    Text,
    /// Punctuation and operators, including the `{{ }} {% %}` delimiters
    Symbol,
    /// A name that is not a keyword
    Identifier,
    /// One of [`KEYWORDS`]
    Keyword,
    /// A quoted string; the value is unescaped, the raw lexeme keeps the quotes
    String,
    /// An integer or decimal literal
    Number,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Symbol => "symbol",
            Self::Identifier => "identifier",
            Self::Keyword => "keyword",
            Self::String => "string",
            Self::Number => "number",
        })
    }
}

/// Words lexed as [`TokenKind::Keyword`] inside markers
pub const KEYWORDS: &[&str] = &["and", "or", "not", "in", "as", "true", "false", "nil"];

/// A token with its source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,
    /// Token value; for strings the unescaped contents
    pub value: String,
    /// The exact source text of the token
    pub raw: String,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based column of the first character, counted in characters
    pub col: usize,
}

impl Token {
    /// Create a token whose value equals its raw lexeme
    pub fn new(kind: TokenKind, raw: impl Into<String>, line: usize, col: usize) -> Self {
        let raw = raw.into();
        Self {
            kind,
            value: raw.clone(),
            raw,
            line,
            col,
        }
    }

    /// Whether the token has the given kind and value
    pub fn is(&self, kind: TokenKind, value: &str) -> bool {
        self.kind == kind && self.value == value
    }

    /// Line and column just past the last character of the raw lexeme
    pub fn end(&self) -> (usize, usize) {
        match self.raw.rfind('\n') {
            Some(last) => {
                let lines = self.raw.matches('\n').count();
                (self.line + lines, self.raw[last + 1..].chars().count() + 1)
            }
            None => (self.line, self.col + self.raw.chars().count()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.raw)
    }
}
