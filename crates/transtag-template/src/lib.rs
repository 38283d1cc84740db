//! # Transtag Template
//!
//! A small Django-style template engine: `{{ expression }}` output,
//! `{% directive … %}` tags supplied by the embedding crate, and `{# … #}`
//! comments.
//!
//! The engine ships no directives of its own. Callers register
//! [`TagParser`]s, wrap the [`Engine`] in an `Arc` and compile templates:
//!
//! ```
//! use std::sync::Arc;
//! use transtag_template::{Context, Engine};
//!
//! let engine = Arc::new(Engine::new());
//! let mut vars = Context::new();
//! vars.insert("name".into(), "world".into());
//! assert_eq!(engine.render_string("Hello {{ name|upper }}!", vars).unwrap(), "Hello WORLD!");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod engine;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod stream;
pub mod token;
pub mod value;

pub use context::{Context, ExecutionContext};
pub use engine::{Engine, Node, TagParser, Template};
pub use error::{TemplateError, TemplateResult};
pub use expr::Expr;
pub use lexer::tokenize;
pub use stream::TokenStream;
pub use token::{Token, TokenKind, KEYWORDS};
pub use value::{to_integer, to_output};
