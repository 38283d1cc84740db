//! Language code and catalog file name helpers

use std::fmt;
use unic_langid::LanguageIdentifier;

/// On-disk catalog formats, told apart by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogFormat {
    /// Text catalog (`.po`)
    Po,
    /// Compiled binary catalog (`.mo`)
    Mo,
}

impl CatalogFormat {
    /// The file extension, including the dot
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Po => ".po",
            Self::Mo => ".mo",
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Po => "po",
            Self::Mo => "mo",
        })
    }
}

/// The base language of a regional code such as `sv_SE` or `zh-Hant-TW`.
///
/// Returns `None` for codes without a region, script or variant subtag. Codes
/// that are not valid language identifiers (a `.UTF-8` suffix, say) fall back
/// to the text before the first `_`. The base keeps the casing of the input.
///
/// # Examples
///
/// ```
/// use transtag_i18n::base_language;
///
/// assert_eq!(base_language("sv_SE").as_deref(), Some("sv"));
/// assert_eq!(base_language("en_US.UTF-8").as_deref(), Some("en"));
/// assert_eq!(base_language("sv"), None);
/// ```
pub fn base_language(code: &str) -> Option<String> {
    match code.parse::<LanguageIdentifier>() {
        Ok(langid) => {
            let regional =
                langid.region.is_some() || langid.script.is_some() || langid.variants().next().is_some();
            if !regional {
                return None;
            }
            code.split(['_', '-']).next().map(str::to_string)
        }
        Err(_) => match code.split_once('_') {
            Some((base, _)) if !base.is_empty() => Some(base.to_string()),
            _ => None,
        },
    }
}

/// Split a catalog file name into its domain and format.
///
/// Hidden files and files without a `.po`/`.mo` extension yield `None`.
pub fn catalog_domain(file_name: &str) -> Option<(String, CatalogFormat)> {
    if file_name.starts_with('.') {
        return None;
    }
    [CatalogFormat::Po, CatalogFormat::Mo]
        .into_iter()
        .find_map(|format| {
            file_name
                .strip_suffix(format.extension())
                .map(|domain| (domain.to_string(), format))
        })
}
