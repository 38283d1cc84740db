//! The compiled form shared by `trans` and `blocktrans`

use std::fmt;
use std::sync::Arc;
use tracing::trace;
use transtag_common::{preview, TransCtx, TranslationRequest, DOMAIN_KEY, LANGUAGE_KEY};
use transtag_i18n::Translator;
use transtag_template::{to_integer, to_output, ExecutionContext, Expr, Node, TemplateError, TemplateResult};

/// What to translate
#[derive(Debug, Clone, PartialEq)]
pub enum TransText {
    /// Text fixed at compile time
    Literal(String),
    /// An expression evaluated on every render
    Expression(Expr),
}

/// One parsed `trans` or `blocktrans` occurrence.
///
/// Immutable after parsing; executing it allocates its own request and
/// child scope, so one node can render concurrently.
pub struct TransNode {
    pub(crate) translator: Arc<dyn Translator>,
    pub(crate) text: TransText,
    pub(crate) plural_text: Option<String>,
    pub(crate) context: Option<String>,
    pub(crate) count: Option<Expr>,
    pub(crate) bindings: Vec<(String, Expr)>,
    pub(crate) output_var: Option<String>,
}

impl fmt::Debug for TransNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransNode")
            .field("text", &self.text)
            .field("plural_text", &self.plural_text)
            .field("context", &self.context)
            .field("count", &self.count)
            .field("bindings", &self.bindings)
            .field("output_var", &self.output_var)
            .finish_non_exhaustive()
    }
}

impl TransNode {
    pub(crate) fn new(translator: Arc<dyn Translator>, text: TransText) -> Self {
        Self {
            translator,
            text,
            plural_text: None,
            context: None,
            count: None,
            bindings: Vec::new(),
            output_var: None,
        }
    }

    /// The literal text, or `None` when the text is an expression
    pub fn text(&self) -> Option<&str> {
        match &self.text {
            TransText::Literal(text) => Some(text),
            TransText::Expression(_) => None,
        }
    }

    /// The plural alternative of a block with `{% plural %}`.
    ///
    /// Plural mode needs both a non-empty alternative and a count.
    pub fn plural_text(&self) -> Option<&str> {
        self.plural_text.as_deref()
    }

    /// The translation context
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The variable the result is bound to instead of being written
    pub fn output_var(&self) -> Option<&str> {
        self.output_var.as_deref()
    }

    /// Names of the variables made available to the translated text
    pub fn binding_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    fn request(&self, ctx: &ExecutionContext) -> TemplateResult<TranslationRequest> {
        let trans_ctx = TransCtx::new(
            ctx.get_str(LANGUAGE_KEY).unwrap_or_default(),
            ctx.get_str(DOMAIN_KEY).unwrap_or_default(),
        );
        let text = match &self.text {
            TransText::Literal(text) => text.clone(),
            TransText::Expression(expr) => to_output(&expr.evaluate(ctx)?),
        };

        let mut request = TranslationRequest::new(trans_ctx, text);
        let plural = self.plural_text.as_ref().filter(|plural| !plural.is_empty());
        if let (Some(plural), Some(count)) = (plural, &self.count) {
            let count = to_integer(&count.evaluate(ctx)?);
            request = request.with_plural(plural.clone(), count);
        }
        if let Some(context) = &self.context {
            request = request.with_context(context.clone());
        }
        Ok(request)
    }
}

impl Node for TransNode {
    fn execute(&self, ctx: &mut ExecutionContext, out: &mut dyn fmt::Write) -> TemplateResult<()> {
        let request = self.request(ctx)?;
        let translated = self.translator.resolve(&request);
        trace!(
            ctx = %request.ctx,
            context = ?request.context,
            count = ?request.count,
            text = %preview(&request.text),
            translated = %preview(&translated),
            "Resolved translation"
        );

        let mut scope = ctx.child();
        for (name, expr) in &self.bindings {
            let value = expr.evaluate(ctx)?;
            scope.set(name.clone(), value);
        }
        // Positions would point into the translation, not the template
        let content = scope.render_string(&translated).map_err(|e| match e {
            TemplateError::Syntax { message, .. } => TemplateError::render(message),
            other => other,
        })?;

        match &self.output_var {
            Some(name) => ctx.set(name.clone(), content),
            None => out.write_str(&content)?,
        }
        Ok(())
    }
}
