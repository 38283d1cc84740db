//! The translation provider used by the template directives
//!
//! [`TemplateTranslator`] owns the locale table: one [`LocaleCatalog`] per
//! language directory, plus base-language aliases for regional codes. The
//! table is complete when construction returns and is never mutated after
//! that, so a translator can be shared across renders behind an `Arc`.

use crate::catalog::{LocaleCatalog, MessageCatalog};
use crate::error::{I18nError, I18nResult};
use crate::locale::{base_language, catalog_domain, CatalogFormat};
use crate::mo_parser::{parse_mo, MoParseError};
use crate::po_parser::parse_po;
use crate::resource::{CatalogSource, FsCatalogSource, SourceEntry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use transtag_common::{LanguageInfo, TransCtx, TranslationRequest};

/// Resolves source text to its translation for a language and domain.
///
/// Implementations return the source text when nothing better is known;
/// a lookup never fails.
pub trait Translator: Send + Sync {
    /// Translate `text`.
    fn get(&self, ctx: &TransCtx, text: &str) -> String;

    /// Translate `text` within translation context `context`.
    fn get_c(&self, ctx: &TransCtx, text: &str, context: &str) -> String;

    /// Translate `text`/`plural`, selecting the form for `count`.
    fn get_n(&self, ctx: &TransCtx, text: &str, plural: &str, count: i64) -> String;

    /// Translate `text`/`plural` within `context`, selecting the form for `count`.
    fn get_nc(&self, ctx: &TransCtx, text: &str, plural: &str, count: i64, context: &str) -> String;

    /// Dispatch a request to the matching lookup.
    ///
    /// A request is plural only when it carries both plural text and a count.
    fn resolve(&self, request: &TranslationRequest) -> String {
        let ctx = &request.ctx;
        let text = request.text.as_str();
        match (request.plural(), request.context.as_deref()) {
            (Some((plural, count)), Some(context)) => self.get_nc(ctx, text, plural, count, context),
            (Some((plural, count)), None) => self.get_n(ctx, text, plural, count),
            (None, Some(context)) => self.get_c(ctx, text, context),
            (None, None) => self.get(ctx, text),
        }
    }
}

/// Gettext-backed translator over a directory of language catalogs.
///
/// The expected layout is one directory per language code holding one
/// `<domain>.po` or `<domain>.mo` file per domain:
///
/// ```text
/// locales/
/// ├── en_GB/other.po
/// └── sv_SE/
///     ├── default.mo
///     └── other.po
/// ```
#[derive(Debug, Default)]
pub struct TemplateTranslator {
    locales: HashMap<String, Arc<LocaleCatalog>>,
}

impl TemplateTranslator {
    /// Load every language below `path` on the local filesystem
    pub fn from_dir<P: AsRef<Path>>(path: P) -> I18nResult<Self> {
        Self::from_source(&FsCatalogSource::new(path))
    }

    /// Load every language from the root of `source`.
    ///
    /// Entries are visited in name order, so when a domain exists as both
    /// `.mo` and `.po` the `.mo` file is loaded and the other skipped.
    pub fn from_source<S: CatalogSource + ?Sized>(source: &S) -> I18nResult<Self> {
        let root = Path::new("");
        let entries = sorted_listing(source, root)?;

        let mut locales = HashMap::new();
        for entry in entries {
            if !entry.is_dir || entry.name.starts_with('.') {
                debug!("Skipping locale root entry {:?}", entry.name);
                continue;
            }
            let catalog = load_locale(source, &entry.name)?;
            locales.insert(entry.name, Arc::new(catalog));
        }

        add_regional_fallbacks(&mut locales);
        info!(languages = locales.len(), "Locale table built");

        Ok(Self { locales })
    }

    /// Build a translator from already loaded catalogs.
    ///
    /// Regional fallbacks are added exactly as for loaded trees.
    pub fn from_catalogs(catalogs: impl IntoIterator<Item = LocaleCatalog>) -> Self {
        let mut locales: HashMap<String, Arc<LocaleCatalog>> = catalogs
            .into_iter()
            .map(|catalog| (catalog.code().to_string(), Arc::new(catalog)))
            .collect();
        add_regional_fallbacks(&mut locales);
        Self { locales }
    }

    /// Language codes in the table, fallbacks included, sorted
    pub fn languages(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Whether lookups for `code` can be answered
    pub fn has_language(&self, code: &str) -> bool {
        self.locales.contains_key(code)
    }

    /// The catalog entry serving `code`
    pub fn catalog(&self, code: &str) -> Option<&Arc<LocaleCatalog>> {
        self.locales.get(code)
    }

    /// Code and display name of every language, sorted by code
    pub fn language_info(&self) -> Vec<LanguageInfo> {
        self.languages()
            .into_iter()
            .map(|code| {
                let name = self
                    .locales
                    .get(code)
                    .and_then(|catalog| catalog.header("Language-Team"))
                    .map(team_name)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(code);
                LanguageInfo {
                    code: code.to_string(),
                    name: name.to_string(),
                }
            })
            .collect()
    }

    fn locale(&self, ctx: &TransCtx) -> Option<&LocaleCatalog> {
        let locale = self.locales.get(&ctx.language).map(Arc::as_ref);
        if locale.is_none() {
            trace!(language = %ctx.language, "no catalogs for language");
        }
        locale
    }
}

impl Translator for TemplateTranslator {
    fn get(&self, ctx: &TransCtx, text: &str) -> String {
        // The empty msgid holds the catalog header
        if text.is_empty() {
            return String::new();
        }
        self.locale(ctx).map_or_else(
            || text.to_string(),
            |locale| locale.get_d(ctx.domain_or_default(), text),
        )
    }

    fn get_c(&self, ctx: &TransCtx, text: &str, context: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        self.locale(ctx).map_or_else(
            || text.to_string(),
            |locale| locale.get_dc(ctx.domain_or_default(), text, context),
        )
    }

    fn get_n(&self, ctx: &TransCtx, text: &str, plural: &str, count: i64) -> String {
        if text.is_empty() {
            return String::new();
        }
        self.locale(ctx).map_or_else(
            || text.to_string(),
            |locale| locale.get_nd(ctx.domain_or_default(), text, plural, count),
        )
    }

    fn get_nc(&self, ctx: &TransCtx, text: &str, plural: &str, count: i64, context: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        self.locale(ctx).map_or_else(
            || text.to_string(),
            |locale| locale.get_ndc(ctx.domain_or_default(), text, plural, count, context),
        )
    }
}

fn sorted_listing<S: CatalogSource + ?Sized>(source: &S, path: &Path) -> I18nResult<Vec<SourceEntry>> {
    let mut entries = source.list(path).map_err(|e| I18nError::DirectoryRead {
        path: source.describe(path),
        source: e,
    })?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn load_locale<S: CatalogSource + ?Sized>(source: &S, code: &str) -> I18nResult<LocaleCatalog> {
    let dir = PathBuf::from(code);
    let mut locale = LocaleCatalog::new(code);

    for entry in sorted_listing(source, &dir)? {
        if entry.is_dir {
            continue;
        }
        let Some((domain, format)) = catalog_domain(&entry.name) else {
            trace!(language = code, file = %entry.name, "not a catalog file");
            continue;
        };
        if locale.has_domain(&domain) {
            warn!(
                language = code,
                domain = %domain,
                "Skipping {} because the domain is already loaded",
                entry.name
            );
            continue;
        }

        let path = dir.join(&entry.name);
        let bytes = source.read(&path).map_err(|e| I18nError::CatalogRead {
            path: source.describe(&path),
            source: e,
        })?;
        let catalog = parse_catalog(&bytes, format).map_err(|e| I18nError::InvalidMo {
            path: source.describe(&path),
            source: e,
        })?;

        debug!(
            language = code,
            domain = %domain,
            format = %format,
            entries = catalog.len(),
            "Loaded catalog"
        );
        locale.add_domain(domain, Box::new(catalog));
    }

    Ok(locale)
}

fn parse_catalog(bytes: &[u8], format: CatalogFormat) -> Result<MessageCatalog, MoParseError> {
    match format {
        CatalogFormat::Po => Ok(parse_po(bytes)),
        CatalogFormat::Mo => parse_mo(bytes),
    }
}

/// Alias each regional code's base language to the same catalog entry,
/// unless the base language has catalogs of its own.
fn add_regional_fallbacks(locales: &mut HashMap<String, Arc<LocaleCatalog>>) {
    let mut codes: Vec<String> = locales.keys().cloned().collect();
    codes.sort_unstable();

    for code in codes {
        let Some(base) = base_language(&code) else {
            continue;
        };
        if locales.contains_key(&base) {
            continue;
        }
        if let Some(catalog) = locales.get(&code).map(Arc::clone) {
            debug!(language = %code, base = %base, "Adding regional fallback");
            locales.insert(base, catalog);
        }
    }
}

/// `Swedish <sv@example.org>` becomes `Swedish`
fn team_name(header: &str) -> &str {
    header
        .split_once('<')
        .map_or(header, |(name, _)| name)
        .trim()
}
