//! Message catalogs and the per-language catalog entry
//!
//! A [`MessageCatalog`] holds one domain of one language, a [`LocaleCatalog`]
//! groups the domains of a language. Both answer the four gettext lookups:
//! plain, context-qualified, plural and plural with context.

use crate::pluralization::PluralRule;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use tracing::{trace, warn};
use transtag_common::preview;

/// Lookups a loaded catalog answers for one domain.
///
/// Missing entries resolve to the source text: `text` for a count of one,
/// `plural` otherwise.
pub trait CatalogResolver: Send + Sync + Debug {
    /// Translate `text`.
    fn get(&self, text: &str) -> String;

    /// Translate `text` within translation context `context`.
    fn get_c(&self, text: &str, context: &str) -> String;

    /// Translate `text`/`plural`, selecting the form for `count`.
    fn get_n(&self, text: &str, plural: &str, count: i64) -> String;

    /// Translate `text`/`plural` within `context`, selecting the form for `count`.
    fn get_nc(&self, text: &str, plural: &str, count: i64, context: &str) -> String;

    /// A header field of the catalog, e.g. `Language-Team`.
    fn header(&self, _name: &str) -> Option<&str> {
        None
    }
}

/// Source-language fallback when no translation exists.
fn untranslated(text: &str, plural: &str, count: i64) -> String {
    if count == 1 {
        text.to_string()
    } else {
        plural.to_string()
    }
}

/// Entries are keyed by optional context and msgid, so plain and plural
/// lookups share one keyspace as in gettext
type EntryKey = (Option<String>, String);

/// A gettext catalog for one language and domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageCatalog {
    headers: BTreeMap<String, String>,
    plural_rule: PluralRule,
    entries: HashMap<EntryKey, Vec<String>>,
}

impl MessageCatalog {
    /// Create an empty catalog using the `n != 1` plural rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the plural rule
    pub fn set_plural_rule(&mut self, rule: PluralRule) {
        self.plural_rule = rule;
    }

    /// The plural rule in effect
    pub const fn plural_rule(&self) -> &PluralRule {
        &self.plural_rule
    }

    /// Record a header field
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Apply the header entry (the translation of the empty msgid).
    ///
    /// Every `Name: value` line is stored; `Plural-Forms` also replaces the
    /// plural rule unless it fails to parse.
    pub fn apply_header(&mut self, headers: &str) {
        for line in headers.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            if name.eq_ignore_ascii_case("Plural-Forms") {
                match PluralRule::parse(value) {
                    Ok(rule) => self.plural_rule = rule,
                    Err(e) => warn!("Ignoring unparsable Plural-Forms header {value:?}: {e}"),
                }
            }
            self.set_header(name, value);
        }
    }

    /// Store the translated forms of `msgid`, replacing earlier ones.
    ///
    /// `forms[0]` answers plain lookups; plural lookups index `forms` with
    /// the plural rule.
    pub fn add_entry(&mut self, context: Option<String>, msgid: impl Into<String>, forms: Vec<String>) {
        self.entries.insert((context, msgid.into()), forms);
    }

    /// Add a simple translation
    pub fn add_translation(&mut self, message: impl Into<String>, translation: impl Into<String>) {
        self.add_entry(None, message, vec![translation.into()]);
    }

    /// Add a contextual translation
    pub fn add_context(
        &mut self,
        context: impl Into<String>,
        message: impl Into<String>,
        translation: impl Into<String>,
    ) {
        self.add_entry(Some(context.into()), message, vec![translation.into()]);
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no translations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn forms(&self, context: Option<&str>, text: &str) -> Option<&Vec<String>> {
        self.entries
            .get(&(context.map(str::to_string), text.to_string()))
    }

    fn singular(&self, context: Option<&str>, text: &str) -> String {
        self.forms(context, text)
            .and_then(|forms| forms.first())
            .filter(|form| !form.is_empty())
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }

    fn select_form(&self, context: Option<&str>, text: &str, plural: &str, count: i64) -> String {
        self.forms(context, text)
            .and_then(|forms| {
                let index = self.plural_rule.index(count)?;
                forms.get(index)
            })
            .filter(|form| !form.is_empty())
            .cloned()
            .unwrap_or_else(|| untranslated(text, plural, count))
    }
}

impl CatalogResolver for MessageCatalog {
    fn get(&self, text: &str) -> String {
        self.singular(None, text)
    }

    fn get_c(&self, text: &str, context: &str) -> String {
        self.singular(Some(context), text)
    }

    fn get_n(&self, text: &str, plural: &str, count: i64) -> String {
        self.select_form(None, text, plural, count)
    }

    fn get_nc(&self, text: &str, plural: &str, count: i64, context: &str) -> String {
        self.select_form(Some(context), text, plural, count)
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// All domains loaded for one language code
#[derive(Debug, Default)]
pub struct LocaleCatalog {
    code: String,
    domains: BTreeMap<String, Box<dyn CatalogResolver>>,
}

impl LocaleCatalog {
    /// Create an empty entry for `code`
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            domains: BTreeMap::new(),
        }
    }

    /// The language code the catalogs were loaded for
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Register the resolver for `domain`; returns `false` and keeps the
    /// existing resolver when the domain is already present
    pub fn add_domain(&mut self, domain: impl Into<String>, resolver: Box<dyn CatalogResolver>) -> bool {
        let domain = domain.into();
        if self.domains.contains_key(&domain) {
            return false;
        }
        self.domains.insert(domain, resolver);
        true
    }

    /// Whether `domain` was loaded
    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    /// Loaded domain names, sorted
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// The resolver for `domain`
    pub fn resolver(&self, domain: &str) -> Option<&dyn CatalogResolver> {
        self.domains.get(domain).map(Box::as_ref)
    }

    /// Translate `text` in `domain`
    pub fn get_d(&self, domain: &str, text: &str) -> String {
        trace!(language = %self.code, domain, text = %preview(text), "plain lookup");
        self.resolver(domain)
            .map_or_else(|| text.to_string(), |resolver| resolver.get(text))
    }

    /// Translate `text` within `context` in `domain`
    pub fn get_dc(&self, domain: &str, text: &str, context: &str) -> String {
        trace!(language = %self.code, domain, context, text = %preview(text), "context lookup");
        self.resolver(domain)
            .map_or_else(|| text.to_string(), |resolver| resolver.get_c(text, context))
    }

    /// Translate `text`/`plural` for `count` in `domain`
    pub fn get_nd(&self, domain: &str, text: &str, plural: &str, count: i64) -> String {
        trace!(language = %self.code, domain, count, text = %preview(text), "plural lookup");
        self.resolver(domain).map_or_else(
            || untranslated(text, plural, count),
            |resolver| resolver.get_n(text, plural, count),
        )
    }

    /// Translate `text`/`plural` for `count` within `context` in `domain`
    pub fn get_ndc(&self, domain: &str, text: &str, plural: &str, count: i64, context: &str) -> String {
        trace!(language = %self.code, domain, context, count, text = %preview(text), "plural context lookup");
        self.resolver(domain).map_or_else(
            || untranslated(text, plural, count),
            |resolver| resolver.get_nc(text, plural, count, context),
        )
    }

    /// First `name` header found across the domains, in domain order
    pub fn header(&self, name: &str) -> Option<&str> {
        self.domains.values().find_map(|resolver| resolver.header(name))
    }
}
