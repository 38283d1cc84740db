//! Cursor over a token sequence, handed to directive parsers

use crate::error::{TemplateError, TemplateResult};
use crate::expr::{self, Expr};
use crate::token::{Token, TokenKind};

/// A consumable sequence of tokens.
///
/// The document stream covers the whole template; a directive's argument
/// stream covers the tokens between its name and the closing `%}`.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    /// Position reported for errors once all tokens are consumed
    eof: (usize, usize),
}

impl TokenStream {
    /// Create a stream; `eof` is the line/column reported for errors at the end
    pub const fn new(tokens: Vec<Token>, eof: (usize, usize)) -> Self {
        Self { tokens, pos: 0, eof }
    }

    /// The token under the cursor
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Move past the current token
    pub fn consume(&mut self) {
        self.consume_n(1);
    }

    /// Move past `n` tokens
    pub fn consume_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    /// Number of tokens not yet consumed
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    /// The current token if it has the given kind and value
    pub fn peek(&self, kind: TokenKind, value: &str) -> Option<&Token> {
        self.peek_n(0, kind, value)
    }

    /// The current token if it has the given kind
    pub fn peek_type(&self, kind: TokenKind) -> Option<&Token> {
        self.peek_type_n(0, kind)
    }

    /// The token `n` places ahead if it has the given kind and value
    pub fn peek_n(&self, n: usize, kind: TokenKind, value: &str) -> Option<&Token> {
        self.tokens
            .get(self.pos + n)
            .filter(|token| token.is(kind, value))
    }

    /// The token `n` places ahead if it has the given kind
    pub fn peek_type_n(&self, n: usize, kind: TokenKind) -> Option<&Token> {
        self.tokens
            .get(self.pos + n)
            .filter(|token| token.kind == kind)
    }

    /// Consume and return the current token if it has the given kind and value
    pub fn match_token(&mut self, kind: TokenKind, value: &str) -> Option<Token> {
        let token = self.peek(kind, value).cloned()?;
        self.consume();
        Some(token)
    }

    /// Consume and return the current token if it has the given kind
    pub fn match_type(&mut self, kind: TokenKind) -> Option<Token> {
        let token = self.peek_type(kind).cloned()?;
        self.consume();
        Some(token)
    }

    /// A syntax error positioned at the current token, or at the end of the
    /// stream when every token was consumed
    pub fn error(&self, message: impl Into<String>) -> TemplateError {
        let (line, col) = self
            .current()
            .map_or(self.eof, |token| (token.line, token.col));
        TemplateError::syntax(line, col, message)
    }

    /// Parse an expression starting at the current token
    pub fn parse_expression(&mut self) -> TemplateResult<Expr> {
        expr::parse(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(tokenize(source).unwrap(), (9, 9))
    }

    #[test]
    fn test_peek_and_match() {
        let mut s = stream("{% count n=1 %}");
        assert!(s.peek(TokenKind::Symbol, "{%").is_some());
        assert!(s.peek_n(1, TokenKind::Identifier, "count").is_some());
        assert!(s.peek_type_n(2, TokenKind::Identifier).is_some());
        assert!(s.peek_type(TokenKind::Identifier).is_none());

        assert!(s.match_token(TokenKind::Symbol, "%}").is_none());
        assert_eq!(s.remaining(), 6);
        s.consume();
        assert_eq!(s.match_type(TokenKind::Identifier).unwrap().value, "count");
        s.consume_n(10);
        assert_eq!(s.remaining(), 0);
        assert!(s.current().is_none());
    }

    #[test]
    fn test_error_position() {
        let mut s = stream("ab {{ x }}");
        s.consume();
        assert_eq!(
            s.error("here"),
            TemplateError::syntax(1, 4, "here")
        );
        s.consume_n(3);
        assert_eq!(s.error("eof"), TemplateError::syntax(9, 9, "eof"));
    }
}
