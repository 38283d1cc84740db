//! # Transtag I18n
//!
//! Gettext catalog loading and lookup for the transtag template directives.
//!
//! This crate builds the locale table from a directory of `.po`/`.mo`
//! catalogs, with regional-to-base-language fallback, and answers plain,
//! context, plural and plural-with-context lookups through [`Translator`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod error;
pub mod locale;
pub mod mo_parser;
pub mod pluralization;
pub mod po_parser;
pub mod resource;
pub mod translator;

pub use catalog::{CatalogResolver, LocaleCatalog, MessageCatalog};
pub use error::{I18nError, I18nResult};
pub use locale::{base_language, catalog_domain, CatalogFormat};
pub use mo_parser::{parse_mo, MoParseError};
pub use pluralization::{PluralRule, PluralRuleError};
pub use po_parser::parse_po;
pub use resource::{CatalogSource, FsCatalogSource, SourceEntry};
pub use translator::{TemplateTranslator, Translator};
