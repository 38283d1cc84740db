//! Template tokenizer.
//!
//! Text outside markers becomes one [`TokenKind::Text`] token per run. Inside
//! `{{ … }}` and `{% … %}` the lexer produces symbols, identifiers, keywords,
//! strings and numbers, each with the 1-based line and column of its first
//! character. `{# … #}` comments produce no tokens.

use crate::error::{TemplateError, TemplateResult};
use crate::token::{Token, TokenKind, KEYWORDS};

/// Operators, longest first so `<=` wins over `<`
const SYMBOLS: &[&str] = &[
    "==", "!=", "<=", ">=", "(", ")", "+", "-", "*", "/", "%", "<", ">", "=", ".", ",", "|", ":",
];

#[derive(Debug, Clone, Copy)]
struct Position {
    idx: usize,
    line: usize,
    col: usize,
}

/// Character-level scanner with line/column tracking
pub struct Lexer {
    chars: Vec<char>,
    idx: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a lexer over `source`
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            idx: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the whole source
    pub fn tokenize(mut self) -> TemplateResult<Vec<Token>> {
        let mut out = Vec::new();
        while self.idx < self.chars.len() {
            if self.starts_with("{#") {
                self.skip_comment()?;
            } else if self.starts_with("{{") {
                self.lex_marker("{{", "}}", &mut out)?;
            } else if self.starts_with("{%") {
                self.lex_marker("{%", "%}", &mut out)?;
            } else {
                out.push(self.lex_text());
            }
        }
        Ok(out)
    }

    /// Line and column just past the end of the source
    pub fn end_position(source: &str) -> (usize, usize) {
        Token::new(TokenKind::Text, source, 1, 1).end()
    }

    fn lex_text(&mut self) -> Token {
        let start = self.position();
        while self.idx < self.chars.len()
            && !(self.starts_with("{{") || self.starts_with("{%") || self.starts_with("{#"))
        {
            self.advance();
        }
        Token::new(TokenKind::Text, self.slice(start), start.line, start.col)
    }

    fn skip_comment(&mut self) -> TemplateResult<()> {
        let start = self.position();
        self.advance_n(2);
        while self.idx < self.chars.len() {
            if self.starts_with("#}") {
                self.advance_n(2);
                return Ok(());
            }
            self.advance();
        }
        Err(TemplateError::syntax(start.line, start.col, "Unterminated comment"))
    }

    fn lex_marker(&mut self, open: &str, close: &str, out: &mut Vec<Token>) -> TemplateResult<()> {
        let start = self.position();
        self.advance_n(2);
        out.push(Token::new(TokenKind::Symbol, open, start.line, start.col));

        loop {
            self.skip_whitespace();
            if self.idx >= self.chars.len() {
                return Err(TemplateError::syntax(
                    start.line,
                    start.col,
                    format!("Unterminated '{open}', expected '{close}'"),
                ));
            }
            if self.starts_with(close) {
                let end = self.position();
                self.advance_n(2);
                out.push(Token::new(TokenKind::Symbol, close, end.line, end.col));
                return Ok(());
            }
            out.push(self.lex_inner()?);
        }
    }

    fn lex_inner(&mut self) -> TemplateResult<Token> {
        let start = self.position();
        let c = self.chars[self.idx];

        if c == '"' || c == '\'' {
            return self.lex_string(start, c);
        }
        if c.is_ascii_digit() {
            return Ok(self.lex_number(start));
        }
        if c.is_alphabetic() || c == '_' {
            while self
                .peek(0)
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
            {
                self.advance();
            }
            let word = self.slice(start);
            let kind = if KEYWORDS.contains(&word.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            return Ok(Token::new(kind, word, start.line, start.col));
        }
        if let Some(symbol) = SYMBOLS.iter().find(|symbol| self.starts_with(symbol)) {
            self.advance_n(symbol.chars().count());
            return Ok(Token::new(TokenKind::Symbol, *symbol, start.line, start.col));
        }

        Err(TemplateError::syntax(
            start.line,
            start.col,
            format!("Unexpected character '{c}'"),
        ))
    }

    fn lex_string(&mut self, start: Position, quote: char) -> TemplateResult<Token> {
        self.advance();
        let mut value = String::new();
        loop {
            let Some(c) = self.peek(0) else {
                return Err(TemplateError::syntax(start.line, start.col, "Unterminated string"));
            };
            self.advance();
            match c {
                c if c == quote => break,
                '\\' => {
                    let Some(escaped) = self.peek(0) else {
                        continue;
                    };
                    self.advance();
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                other => value.push(other),
            }
        }
        Ok(Token {
            kind: TokenKind::String,
            value,
            raw: self.slice(start),
            line: start.line,
            col: start.col,
        })
    }

    fn lex_number(&mut self, start: Position) -> Token {
        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        Token::new(TokenKind::Number, self.slice(start), start.line, start.col)
    }

    fn skip_whitespace(&mut self) {
        while self.peek(0).is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(offset, c)| self.peek(offset) == Some(c))
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }

    fn advance(&mut self) {
        let Some(c) = self.peek(0) else {
            return;
        };
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    const fn position(&self) -> Position {
        Position {
            idx: self.idx,
            line: self.line,
            col: self.col,
        }
    }

    fn slice(&self, start: Position) -> String {
        self.chars[start.idx..self.idx].iter().collect()
    }
}

/// Tokenize `source`
pub fn tokenize(source: &str) -> TemplateResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
