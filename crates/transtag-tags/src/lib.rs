//! # Transtag Tags
//!
//! Translation directives for the transtag template engine.
//!
//! - `{% trans "text" [context "ctx"] [as var] %}` translates a string literal
//!   or the value of an expression.
//! - `{% blocktrans [count n=expr] [context "ctx"] [asvar var] [with a=expr …] %}`
//!   translates its body, optionally with a `{% plural %}` alternative.
//!
//! The language and domain come from the `_language` and `_domain` variables
//! at render time. Translated text is rendered again so that markers such as
//! `{{ n }}` inside a translation are filled from the block's bindings.
//!
//! ```no_run
//! use std::sync::Arc;
//! use transtag_i18n::TemplateTranslator;
//! use transtag_template::{Context, Engine};
//!
//! let translator = Arc::new(TemplateTranslator::from_dir("locales").unwrap());
//! let mut engine = Engine::new();
//! transtag_tags::register(&mut engine, translator).unwrap();
//! let engine = Arc::new(engine);
//!
//! let mut vars = Context::new();
//! vars.insert("_language".into(), "sv_SE".into());
//! let out = engine.render_string(r#"{% trans "Hello world!" %}"#, vars).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod blocktrans;
pub mod node;
pub mod reconstruct;
pub mod trans;

pub use blocktrans::BlockTransTag;
pub use node::{TransNode, TransText};
pub use reconstruct::TextReconstructor;
pub use trans::TransTag;

use std::sync::Arc;
use tracing::debug;
use transtag_i18n::Translator;
use transtag_template::{Engine, TemplateResult};

/// Register `trans` and `blocktrans` on `engine`.
///
/// Fails when either name is already taken.
pub fn register(engine: &mut Engine, translator: Arc<dyn Translator>) -> TemplateResult<()> {
    engine.register_tag("trans", TransTag::new(Arc::clone(&translator)))?;
    engine.register_tag("blocktrans", BlockTransTag::new(translator))?;
    debug!("Registered translation tags");
    Ok(())
}
