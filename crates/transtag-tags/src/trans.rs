//! `{% trans %}`: translate a single string or expression.
//!
//! ```text
//! {% trans "Hello world!" %}
//! {% trans "May" context "month" %}
//! {% trans title as translated_title %}{{ translated_title }}
//! ```

use crate::node::{TransNode, TransText};
use std::sync::Arc;
use transtag_i18n::Translator;
use transtag_template::{Node, TagParser, TemplateResult, Token, TokenKind, TokenStream};

/// Parser for the inline directive
pub struct TransTag {
    translator: Arc<dyn Translator>,
}

impl TransTag {
    /// Create the directive, resolving through `translator`
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Parse the arguments into a node
    pub fn parse_node(&self, args: &mut TokenStream) -> TemplateResult<TransNode> {
        let text = if let Some(token) = args.match_type(TokenKind::String) {
            TransText::Literal(token.value)
        } else if args.peek_type(TokenKind::Identifier).is_some() {
            TransText::Expression(args.parse_expression()?)
        } else {
            return Err(args.error(
                "Tag 'trans' requires at least one argument, which must be a string or identifier",
            ));
        };
        let mut node = TransNode::new(Arc::clone(&self.translator), text);

        while args.remaining() > 0 {
            if args.peek(TokenKind::Keyword, "as").is_some() {
                if node.output_var.is_some() {
                    return Err(args.error("'as' can only be given once"));
                }
                args.consume();
                node.output_var = Some(parse_identifier(args, "as")?);
            } else if args.peek(TokenKind::Identifier, "context").is_some() {
                if node.context.is_some() {
                    return Err(args.error("'context' can only be given once"));
                }
                args.consume();
                node.context = Some(parse_context(args)?);
            } else {
                return Err(args.error("Expected 'as' or 'context'"));
            }
        }

        Ok(node)
    }
}

impl TagParser for TransTag {
    fn parse(&self, _doc: &mut TokenStream, _start: &Token, args: &mut TokenStream) -> TemplateResult<Box<dyn Node>> {
        Ok(Box::new(self.parse_node(args)?))
    }
}

/// The identifier following `keyword`
pub(crate) fn parse_identifier(args: &mut TokenStream, keyword: &str) -> TemplateResult<String> {
    args.match_type(TokenKind::Identifier)
        .map(|token| token.value)
        .ok_or_else(|| args.error(format!("Expected '{keyword}' to be followed by an identifier")))
}

/// The string literal following `context`
pub(crate) fn parse_context(args: &mut TokenStream) -> TemplateResult<String> {
    args.match_type(TokenKind::String)
        .map(|token| token.value)
        .ok_or_else(|| args.error("Expected 'context' to be followed by a string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use transtag_common::TransCtx;
    use transtag_template::tokenize;

    /// Returns the arguments it was called with
    struct Recorder;

    impl Translator for Recorder {
        fn get(&self, _ctx: &TransCtx, text: &str) -> String {
            format!("get({text})")
        }
        fn get_c(&self, _ctx: &TransCtx, text: &str, context: &str) -> String {
            format!("get_c({text},{context})")
        }
        fn get_n(&self, _ctx: &TransCtx, text: &str, plural: &str, count: i64) -> String {
            format!("get_n({text},{plural},{count})")
        }
        fn get_nc(&self, _ctx: &TransCtx, text: &str, plural: &str, count: i64, context: &str) -> String {
            format!("get_nc({text},{plural},{count},{context})")
        }
    }

    fn parse(args: &str) -> TemplateResult<TransNode> {
        let tokens = tokenize(&format!("{{% {args} %}}")).unwrap();
        let inner = tokens[1..tokens.len() - 1].to_vec();
        let mut stream = TokenStream::new(inner, (1, 1));
        TransTag::new(Arc::new(Recorder)).parse_node(&mut stream)
    }

    #[test]
    fn test_literal_with_clauses_in_either_order() {
        let node = parse(r#""test" as out context "ctx""#).unwrap();
        assert_eq!(node.text(), Some("test"));
        assert_eq!(node.output_var(), Some("out"));
        assert_eq!(node.context(), Some("ctx"));

        let node = parse(r#""test" context "ctx" as out"#).unwrap();
        assert_eq!(node.output_var(), Some("out"));
        assert_eq!(node.context(), Some("ctx"));
    }

    #[test]
    fn test_expression_text() {
        let node = parse("page.title as t").unwrap();
        assert_eq!(node.text(), None);
        assert_eq!(node.output_var(), Some("t"));
    }

    #[test]
    fn test_argument_errors() {
        assert!(parse("").is_err());
        assert!(parse("42").is_err());
        assert!(parse(r#""test" as"#).is_err());
        assert!(parse(r#""test" as "name""#).is_err());
        assert!(parse(r#""test" context blah"#).is_err());
        assert!(parse(r#""test" context"#).is_err());
        assert!(parse(r#""test" as a as b"#).is_err());
        assert!(parse(r#""test" context "a" context "b""#).is_err());
        assert!(parse(r#""test" with x=1"#).is_err());
    }

    #[test]
    fn test_error_position_points_at_offending_token() {
        let err = parse(r#""test" context blah"#).unwrap_err();
        assert_eq!(
            err,
            transtag_template::TemplateError::syntax(1, 19, "Expected 'context' to be followed by a string")
        );
    }
}
