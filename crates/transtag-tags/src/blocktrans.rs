//! `{% blocktrans %}`: translate a block of template source.
//!
//! The body is not compiled. Its source text is reconstructed from the
//! tokens and used as the message id, so the catalog sees exactly what the
//! author wrote, markers included:
//!
//! ```text
//! {% blocktrans count cnt=messages|length context "inbox" %}
//! You have {{ cnt }} message.
//! {% plural %}
//! You have {{ cnt }} messages.
//! {% endblocktrans %}
//! ```

use crate::node::{TransNode, TransText};
use crate::reconstruct::TextReconstructor;
use crate::trans::{parse_context, parse_identifier};
use std::sync::Arc;
use transtag_i18n::Translator;
use transtag_template::{Expr, Node, TagParser, TemplateResult, Token, TokenKind, TokenStream};

const PLURAL: &str = "plural";
const END: &str = "endblocktrans";

/// Parser for the block directive
pub struct BlockTransTag {
    translator: Arc<dyn Translator>,
}

impl BlockTransTag {
    /// Create the directive, resolving through `translator`
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Parse the arguments, then read the body from `doc` up to the closing
    /// `{% endblocktrans %}`
    pub fn parse_node(&self, doc: &mut TokenStream, args: &mut TokenStream) -> TemplateResult<TransNode> {
        let clauses = Clauses::parse(args)?;

        let (text, terminator) = read_until(doc, &[PLURAL, END])?;
        let plural_text = if terminator == PLURAL {
            Some(read_until(doc, &[END])?.0)
        } else {
            None
        };

        let mut node = TransNode::new(Arc::clone(&self.translator), TransText::Literal(text));
        node.plural_text = plural_text;
        node.context = clauses.context;
        node.count = clauses.count;
        node.bindings = clauses.bindings;
        node.output_var = clauses.output_var;
        Ok(node)
    }
}

impl TagParser for BlockTransTag {
    fn parse(&self, doc: &mut TokenStream, _start: &Token, args: &mut TokenStream) -> TemplateResult<Box<dyn Node>> {
        Ok(Box::new(self.parse_node(doc, args)?))
    }
}

#[derive(Debug, Default)]
struct Clauses {
    count: Option<Expr>,
    context: Option<String>,
    output_var: Option<String>,
    bindings: Vec<(String, Expr)>,
}

impl Clauses {
    fn parse(args: &mut TokenStream) -> TemplateResult<Self> {
        let mut clauses = Self::default();
        let mut seen_with = false;

        while let Some(token) = args.current().cloned() {
            let keyword = if token.kind == TokenKind::Identifier { token.value.as_str() } else { "" };
            match keyword {
                "count" => {
                    if clauses.count.is_some() {
                        return Err(args.error("'count' can only be given once"));
                    }
                    args.consume();
                    let (name, expr) = clauses.parse_binding(args)?;
                    clauses.count = Some(expr.clone());
                    clauses.bindings.push((name, expr));
                }
                "context" => {
                    if clauses.context.is_some() {
                        return Err(args.error("'context' can only be given once"));
                    }
                    args.consume();
                    clauses.context = Some(parse_context(args)?);
                }
                "asvar" => {
                    if clauses.output_var.is_some() {
                        return Err(args.error("'asvar' can only be given once"));
                    }
                    args.consume();
                    clauses.output_var = Some(parse_identifier(args, "asvar")?);
                }
                "with" => {
                    if seen_with {
                        return Err(args.error("'with' can only be given once"));
                    }
                    seen_with = true;
                    args.consume();
                    loop {
                        let (name, expr) = clauses.parse_binding(args)?;
                        clauses.bindings.push((name, expr));
                        if args.peek_type(TokenKind::Identifier).is_none()
                            || args.peek_n(1, TokenKind::Symbol, "=").is_none()
                        {
                            break;
                        }
                    }
                }
                _ => return Err(args.error("Expected 'count', 'context', 'asvar' or 'with'")),
            }
        }

        Ok(clauses)
    }

    /// `<ident>=<expr>`
    fn parse_binding(&self, args: &mut TokenStream) -> TemplateResult<(String, Expr)> {
        let Some(name) = args.peek_type(TokenKind::Identifier).cloned() else {
            return Err(args.error("Expected a variable name"));
        };
        if self.bindings.iter().any(|(bound, _)| *bound == name.value) {
            return Err(args.error(format!("Variable '{}' is bound more than once", name.value)));
        }
        args.consume();
        args.match_token(TokenKind::Symbol, "=")
            .ok_or_else(|| args.error(format!("Expected '=' after '{}'", name.value)))?;
        let expr = args.parse_expression()?;
        Ok((name.value, expr))
    }
}

/// Reconstruct the body text up to one of the `terminators`.
///
/// Returns the text and the name of the terminator found. The terminator
/// itself is consumed.
fn read_until(doc: &mut TokenStream, terminators: &[&str]) -> TemplateResult<(String, String)> {
    let mut text = TextReconstructor::new();

    while let Some(token) = doc.current().cloned() {
        if token.is(TokenKind::Symbol, "{%") {
            let name = doc
                .peek_type_n(1, TokenKind::Identifier)
                .filter(|name| terminators.contains(&name.value.as_str()))
                .map(|name| name.value.clone());
            if let Some(name) = name {
                if doc.peek_n(2, TokenKind::Symbol, "%}").is_none() {
                    doc.consume_n(2);
                    return Err(doc.error(format!("Tag '{name}' takes no arguments")));
                }
                doc.consume_n(3);
                return Ok((text.finish(), name));
            }
        }
        text.push(&token);
        doc.consume();
    }

    Err(doc.error(format!("Unexpected EOF, expected '{{% {END} %}}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use transtag_template::{tokenize, TemplateError};

    fn doc(source: &str) -> TokenStream {
        TokenStream::new(tokenize(source).unwrap(), (9, 9))
    }

    #[test]
    fn test_read_until_stops_at_terminator() {
        let mut d = doc("a {{ b }}{% endblocktrans %}rest");
        let (text, name) = read_until(&mut d, &[END]).unwrap();
        assert_eq!(text, "a {{ b }}");
        assert_eq!(name, END);
        assert_eq!(d.current().unwrap().value, "rest");
    }

    #[test]
    fn test_read_until_plural_then_end() {
        let mut d = doc("one{% plural %}many{% endblocktrans %}");
        let (text, name) = read_until(&mut d, &[PLURAL, END]).unwrap();
        assert_eq!((text.as_str(), name.as_str()), ("one", PLURAL));
        let (text, name) = read_until(&mut d, &[END]).unwrap();
        assert_eq!((text.as_str(), name.as_str()), ("many", END));
        assert_eq!(d.remaining(), 0);
    }

    #[test]
    fn test_other_directives_are_literal() {
        let mut d = doc("x {% plural %} {% if y %}{% endblocktrans %}");
        let (text, _) = read_until(&mut d, &[END]).unwrap();
        assert_eq!(text, "x {% plural %} {% if y %}");
    }

    #[test]
    fn test_terminator_with_arguments() {
        let mut d = doc("x{% endblocktrans now %}");
        let err = read_until(&mut d, &[END]).unwrap_err();
        assert_eq!(err, TemplateError::syntax(1, 19, "Tag 'endblocktrans' takes no arguments"));
    }

    #[test]
    fn test_unterminated_body() {
        let mut d = doc("text");
        let err = read_until(&mut d, &[END]).unwrap_err();
        assert_eq!(err, TemplateError::syntax(9, 9, "Unexpected EOF, expected '{% endblocktrans %}'"));
    }

    fn clauses(source: &str) -> TemplateResult<Clauses> {
        let tokens = tokenize(&format!("{{% {source} %}}")).unwrap();
        let mut args = TokenStream::new(tokens[1..tokens.len() - 1].to_vec(), (1, 99));
        Clauses::parse(&mut args)
    }

    #[test]
    fn test_clauses() {
        let parsed = clauses(r#"with a=1 b=x.y count n=items|length context "c" asvar out"#).unwrap();
        let names: Vec<_> = parsed.bindings.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["a", "b", "n"]);
        assert!(parsed.count.is_some());
        assert_eq!(parsed.context.as_deref(), Some("c"));
        assert_eq!(parsed.output_var.as_deref(), Some("out"));

        let empty = clauses("").unwrap();
        assert!(empty.count.is_none() && empty.bindings.is_empty());
    }

    #[test]
    fn test_clause_errors() {
        assert!(clauses("count").is_err());
        assert!(clauses("count n").is_err());
        assert!(clauses("count n=").is_err());
        assert!(clauses("count n=1 count m=2").is_err());
        assert!(clauses("context").is_err());
        assert!(clauses("context name").is_err());
        assert!(clauses("asvar").is_err());
        assert!(clauses(r#"asvar "x""#).is_err());
        assert!(clauses("with").is_err());
        assert!(clauses("with a=1 a=2").is_err());
        assert!(clauses("count a=1 with a=2").is_err());
        assert!(clauses("as x").is_err());
        assert!(clauses("42").is_err());
    }

    #[test]
    fn test_duplicate_binding_points_at_name() {
        let err = clauses("with a=1 a=2").unwrap_err();
        assert_eq!(err, TemplateError::syntax(1, 13, "Variable 'a' is bound more than once"));
    }
}
