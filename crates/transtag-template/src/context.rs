//! Render-time variable scopes

use crate::engine::Engine;
use crate::error::TemplateResult;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Variables passed to a render, keyed by name
pub type Context = Map<String, Value>;

/// Variable scopes of one render.
///
/// Lookups check the private scope first and fall back to the public scope.
/// Templates and directives write to the public scope; the private scope is
/// reserved for values the embedding application sets.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    engine: Arc<Engine>,
    /// Variables only the embedding application sets; checked first
    pub private: Context,
    /// Variables passed to the render and bound by directives
    pub public: Context,
}

impl ExecutionContext {
    /// Create a context rendering with `engine` over `public`
    pub fn new(engine: Arc<Engine>, public: Context) -> Self {
        Self {
            engine,
            private: Map::new(),
            public,
        }
    }

    /// Set the private scope
    #[must_use]
    pub fn with_private(mut self, private: Context) -> Self {
        self.private = private;
        self
    }

    /// The engine templates in this context are compiled with
    pub const fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Look a variable up, private scope first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.private.get(name).or_else(|| self.public.get(name))
    }

    /// A string variable, private scope first.
    ///
    /// A private value that is not a string does not hide a public one.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.private
            .get(name)
            .and_then(Value::as_str)
            .or_else(|| self.public.get(name).and_then(Value::as_str))
    }

    /// Bind `name` in the public scope
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.public.insert(name.into(), value.into());
    }

    /// A child context starting with copies of both scopes.
    ///
    /// Bindings made in the child are not visible to the parent.
    #[must_use]
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// Compile `source` with this context's engine and render it against
    /// this context's scopes
    pub fn render_string(&self, source: &str) -> TemplateResult<String> {
        let template = self.engine.compile(source)?;
        let mut scope = self.child();
        let mut out = String::new();
        template.render(&mut scope, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> ExecutionContext {
        let mut public = Context::new();
        public.insert("name".to_string(), json!("public"));
        public.insert("_language".to_string(), json!("en_GB"));
        let mut private = Context::new();
        private.insert("name".to_string(), json!("private"));
        private.insert("_language".to_string(), json!(42));
        ExecutionContext::new(Arc::new(Engine::new()), public).with_private(private)
    }

    #[test]
    fn test_private_scope_wins() {
        let ctx = context();
        assert_eq!(ctx.get("name"), Some(&json!("private")));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn test_get_str_skips_non_strings() {
        let ctx = context();
        assert_eq!(ctx.get_str("_language"), Some("en_GB"));
        assert_eq!(ctx.get_str("name"), Some("private"));
    }

    #[test]
    fn test_child_is_a_copy() {
        let ctx = context();
        let mut child = ctx.child();
        child.set("extra", 1);
        assert_eq!(child.get("extra"), Some(&json!(1)));
        assert_eq!(ctx.get("extra"), None);
    }

    #[test]
    fn test_render_string() {
        let mut ctx = context();
        ctx.set("count", 3);
        assert_eq!(
            ctx.render_string("{{ name }} has {{ count }}").unwrap(),
            "private has 3"
        );
        assert!(ctx.render_string("{{ oops").is_err());
    }
}
