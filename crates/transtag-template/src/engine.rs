//! Directive registry, compilation and rendering

use crate::context::{Context, ExecutionContext};
use crate::error::{TemplateError, TemplateResult};
use crate::expr::Expr;
use crate::lexer::{tokenize, Lexer};
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind};
use crate::value::to_output;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A compiled piece of a template
pub trait Node: Send + Sync + fmt::Debug {
    /// Render into `out`, reading and binding variables through `ctx`
    fn execute(&self, ctx: &mut ExecutionContext, out: &mut dyn fmt::Write) -> TemplateResult<()>;
}

/// Turns a `{% name … %}` occurrence into a [`Node`].
///
/// `args` holds the tokens between the name and `%}`; every one of them must
/// be consumed. `doc` is positioned just after `%}`, so block directives can
/// read their body from it.
pub trait TagParser: Send + Sync {
    /// Parse one occurrence of the directive
    fn parse(
        &self,
        doc: &mut TokenStream,
        start: &Token,
        args: &mut TokenStream,
    ) -> TemplateResult<Box<dyn Node>>;
}

impl<F> TagParser for F
where
    F: Fn(&mut TokenStream, &Token, &mut TokenStream) -> TemplateResult<Box<dyn Node>> + Send + Sync,
{
    fn parse(
        &self,
        doc: &mut TokenStream,
        start: &Token,
        args: &mut TokenStream,
    ) -> TemplateResult<Box<dyn Node>> {
        self(doc, start, args)
    }
}

/// Template engine holding the registered directives.
///
/// Register directives first, then share the engine behind an [`Arc`] to
/// compile templates.
#[derive(Default)]
pub struct Engine {
    tags: HashMap<String, Arc<dyn TagParser>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.tags.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Engine").field("tags", &names).finish()
    }
}

impl Engine {
    /// Create an engine without directives
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directive; fails when `name` is taken
    pub fn register_tag(&mut self, name: impl Into<String>, parser: impl TagParser + 'static) -> TemplateResult<()> {
        let name = name.into();
        if self.tags.contains_key(&name) {
            return Err(TemplateError::DuplicateTag(name));
        }
        debug!(tag = %name, "Registered tag");
        self.tags.insert(name, Arc::new(parser));
        Ok(())
    }

    /// Register a directive, replacing any existing one of the same name
    pub fn replace_tag(&mut self, name: impl Into<String>, parser: impl TagParser + 'static) {
        let name = name.into();
        debug!(tag = %name, "Replaced tag");
        self.tags.insert(name, Arc::new(parser));
    }

    /// Whether a directive is registered under `name`
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Compile `source` into a template bound to this engine
    pub fn compile(self: &Arc<Self>, source: &str) -> TemplateResult<Template> {
        let tokens = tokenize(source)?;
        let mut doc = TokenStream::new(tokens, Lexer::end_position(source));
        let nodes = self.parse_document(&mut doc)?;
        trace!(nodes = nodes.len(), "Compiled template");
        Ok(Template {
            engine: Arc::clone(self),
            nodes,
        })
    }

    /// Compile and render `source` in one step
    pub fn render_string(self: &Arc<Self>, source: &str, public: Context) -> TemplateResult<String> {
        self.compile(source)?.execute(public)
    }

    fn parse_document(&self, doc: &mut TokenStream) -> TemplateResult<Vec<Box<dyn Node>>> {
        let mut nodes: Vec<Box<dyn Node>> = Vec::new();

        while let Some(token) = doc.current().cloned() {
            match token.kind {
                TokenKind::Text => {
                    doc.consume();
                    nodes.push(Box::new(TextNode(token.value)));
                }
                TokenKind::Symbol if token.value == "{{" => {
                    doc.consume();
                    let expr = doc.parse_expression()?;
                    doc.match_token(TokenKind::Symbol, "}}")
                        .ok_or_else(|| doc.error("Expected '}}'"))?;
                    nodes.push(Box::new(OutputNode(expr)));
                }
                TokenKind::Symbol if token.value == "{%" => {
                    doc.consume();
                    nodes.push(self.parse_tag(doc)?);
                }
                _ => return Err(doc.error(format!("Unexpected {token}"))),
            }
        }

        Ok(nodes)
    }

    fn parse_tag(&self, doc: &mut TokenStream) -> TemplateResult<Box<dyn Node>> {
        let name = doc
            .match_type(TokenKind::Identifier)
            .ok_or_else(|| doc.error("Expected a tag name after '{%'"))?;
        let parser = self.tags.get(&name.value).cloned().ok_or_else(|| {
            TemplateError::syntax(name.line, name.col, format!("Unknown tag '{}'", name.value))
        })?;

        let mut arg_tokens = Vec::new();
        let close = loop {
            let Some(token) = doc.current().cloned() else {
                return Err(doc.error(format!("Tag '{}' is missing '%}}'", name.value)));
            };
            doc.consume();
            if token.is(TokenKind::Symbol, "%}") {
                break token;
            }
            arg_tokens.push(token);
        };

        let mut args = TokenStream::new(arg_tokens, (close.line, close.col));
        let node = parser.parse(doc, &name, &mut args)?;
        if args.remaining() > 0 {
            return Err(args.error(format!("Malformed '{}' tag arguments", name.value)));
        }
        Ok(node)
    }
}

/// Literal text
#[derive(Debug)]
struct TextNode(String);

impl Node for TextNode {
    fn execute(&self, _ctx: &mut ExecutionContext, out: &mut dyn fmt::Write) -> TemplateResult<()> {
        out.write_str(&self.0)?;
        Ok(())
    }
}

/// `{{ expression }}`
#[derive(Debug)]
struct OutputNode(Expr);

impl Node for OutputNode {
    fn execute(&self, ctx: &mut ExecutionContext, out: &mut dyn fmt::Write) -> TemplateResult<()> {
        let value = self.0.evaluate(ctx)?;
        out.write_str(&to_output(&value))?;
        Ok(())
    }
}

/// A compiled template
#[derive(Debug)]
pub struct Template {
    engine: Arc<Engine>,
    nodes: Vec<Box<dyn Node>>,
}

impl Template {
    /// Render with `public` as the public scope
    pub fn execute(&self, public: Context) -> TemplateResult<String> {
        let mut out = String::new();
        self.execute_writer(public, &mut out)?;
        Ok(out)
    }

    /// Render into `out` with `public` as the public scope
    pub fn execute_writer(&self, public: Context, out: &mut dyn fmt::Write) -> TemplateResult<()> {
        let mut ctx = ExecutionContext::new(Arc::clone(&self.engine), public);
        self.render(&mut ctx, out)
    }

    /// Render into `out` against an existing context
    pub fn render(&self, ctx: &mut ExecutionContext, out: &mut dyn fmt::Write) -> TemplateResult<()> {
        for node in &self.nodes {
            node.execute(ctx, out)?;
        }
        Ok(())
    }
}
