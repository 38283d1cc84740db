//! Gettext .po file parser
//!
//! Converts the text catalog format into a [`MessageCatalog`]. The parser is
//! lenient: lines it does not understand are skipped, as gettext tools do for
//! obsolete (`#~`) and comment lines.

use crate::catalog::MessageCatalog;
use tracing::{trace, warn};

/// Highest accepted `msgstr[N]` index; no language has this many plural forms
const MAX_PLURAL_INDEX: usize = 31;

/// Which keyword the following continuation lines extend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str(usize),
}

/// Entry in a .po file
#[derive(Debug, Clone, Default)]
struct PoEntry {
    msgctxt: Option<String>,
    msgid: String,
    msgid_plural: Option<String>,
    msgstr: Vec<String>,
    fuzzy: bool,
}

impl PoEntry {
    fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none()
    }
}

/// Parse the contents of a .po file
///
/// # Examples
///
/// ```
/// use transtag_i18n::{parse_po, CatalogResolver};
///
/// let catalog = parse_po(b"msgid \"Hello\"\nmsgstr \"Bonjour\"\n");
/// assert_eq!(catalog.get("Hello"), "Bonjour");
/// ```
pub fn parse_po(contents: &[u8]) -> MessageCatalog {
    let text = String::from_utf8_lossy(contents);
    let mut catalog = MessageCatalog::new();
    let mut entry = PoEntry::default();
    let mut field: Option<Field> = None;
    let mut pending_fuzzy = false;

    for (number, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }
        if let Some(flags) = trimmed.strip_prefix("#,") {
            pending_fuzzy |= flags.split(',').any(|flag| flag.trim() == "fuzzy");
            continue;
        }
        if trimmed.starts_with('#') {
            continue;
        }

        // A new keyword after any msgstr starts the next entry
        let starts_entry = trimmed.starts_with("msgctxt") || trimmed.starts_with("msgid ");
        if starts_entry && matches!(field, Some(Field::Str(_))) {
            add_entry_to_catalog(&mut catalog, std::mem::take(&mut entry));
            field = None;
        }
        if starts_entry && field.is_none() {
            entry.fuzzy = std::mem::take(&mut pending_fuzzy);
        }

        if let Some(value) = parse_keyword(trimmed, "msgctxt") {
            entry.msgctxt = Some(value);
            field = Some(Field::Context);
        } else if let Some(value) = parse_keyword(trimmed, "msgid_plural") {
            entry.msgid_plural = Some(value);
            field = Some(Field::IdPlural);
        } else if let Some(value) = parse_keyword(trimmed, "msgid") {
            entry.msgid = value;
            field = Some(Field::Id);
        } else if let Some((index, value)) = parse_indexed_msgstr(trimmed) {
            if index > MAX_PLURAL_INDEX {
                warn!(line = number + 1, index, "skipping msgstr with out-of-range plural index");
            } else {
                if entry.msgstr.len() <= index {
                    entry.msgstr.resize(index + 1, String::new());
                }
                entry.msgstr[index] = value;
            }
            field = Some(Field::Str(index));
        } else if let Some(value) = parse_keyword(trimmed, "msgstr") {
            entry.msgstr = vec![value];
            field = Some(Field::Str(0));
        } else if let Some(value) = parse_quoted(trimmed) {
            let target = match field {
                Some(Field::Context) => entry.msgctxt.as_mut(),
                Some(Field::Id) => Some(&mut entry.msgid),
                Some(Field::IdPlural) => entry.msgid_plural.as_mut(),
                Some(Field::Str(index)) => entry.msgstr.get_mut(index),
                None => None,
            };
            if let Some(target) = target {
                target.push_str(&value);
            }
        } else {
            trace!(line = number + 1, "skipping unrecognised .po line");
        }
    }

    if field.is_some() {
        add_entry_to_catalog(&mut catalog, entry);
    }

    catalog
}

/// Parse a keyword and its quoted value from a line
fn parse_keyword(line: &str, keyword: &str) -> Option<String> {
    let rest = line.strip_prefix(keyword)?;
    if !rest.starts_with([' ', '\t', '"']) {
        return None;
    }
    parse_quoted(rest.trim())
}

/// Parse indexed msgstr (e.g., `msgstr[0]`, `msgstr[1]`)
fn parse_indexed_msgstr(line: &str) -> Option<(usize, String)> {
    let rest = line.strip_prefix("msgstr[")?;
    let (index, rest) = rest.split_once(']')?;
    let index = index.trim().parse().ok()?;
    Some((index, parse_quoted(rest.trim())?))
}

/// Unquote and unescape a `"..."` literal
fn parse_quoted(value: &str) -> Option<String> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    Some(unescape_string(inner))
}

/// Unescape a string (handle \n, \t, \r, \", \\)
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// Add a parsed entry to the catalog
fn add_entry_to_catalog(catalog: &mut MessageCatalog, entry: PoEntry) {
    if entry.is_header() {
        if let Some(headers) = entry.msgstr.first() {
            catalog.apply_header(headers);
        }
        return;
    }

    // Untranslated and fuzzy entries resolve to the source text
    if entry.fuzzy || entry.msgstr.iter().all(String::is_empty) {
        return;
    }

    // A singular entry keeps only its msgstr; plural entries keep every form
    let mut forms = entry.msgstr;
    if entry.msgid_plural.is_none() {
        forms.truncate(1);
    }
    catalog.add_entry(entry.msgctxt, entry.msgid, forms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogResolver;
    use crate::pluralization::PluralRule;

    #[test]
    fn test_parse_simple_translation() {
        let po_content = r#"
msgid "Hello"
msgstr "Bonjour"

msgid "Goodbye"
msgstr "Au revoir"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.get("Hello"), "Bonjour");
        assert_eq!(catalog.get("Goodbye"), "Au revoir");
    }

    #[test]
    fn test_parse_plural_translation() {
        let po_content = r#"
msgid "item"
msgid_plural "items"
msgstr[0] "article"
msgstr[1] "articles"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.get_n("item", "items", 1), "article");
        assert_eq!(catalog.get_n("item", "items", 5), "articles");
    }

    #[test]
    fn test_parse_contextual_translation() {
        let po_content = r#"
msgctxt "menu"
msgid "File"
msgstr "Fichier"

msgctxt "verb"
msgid "File"
msgstr "Classer"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.get_c("File", "menu"), "Fichier");
        assert_eq!(catalog.get_c("File", "verb"), "Classer");
        assert_eq!(catalog.get("File"), "File");
    }

    #[test]
    fn test_parse_contextual_plural() {
        let po_content = r#"
msgctxt "fruit"
msgid "apple"
msgid_plural "apples"
msgstr[0] "pomme"
msgstr[1] "pommes"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.get_nc("apple", "apples", 1, "fruit"), "pomme");
        assert_eq!(catalog.get_nc("apple", "apples", 2, "fruit"), "pommes");
        assert_eq!(catalog.get_n("apple", "apples", 2), "apples");
    }

    #[test]
    fn test_singular_and_plural_entries_share_msgids() {
        let po_content = r#"
msgid "Hello"
msgstr "Hej"

msgid "One apple"
msgid_plural "%d apples"
msgstr[0] "Ett äpple"
msgstr[1] "%d äpplen"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.get_n("Hello", "Hellos", 1), "Hej");
        assert_eq!(catalog.get_n("Hello", "Hellos", 2), "Hellos");
        assert_eq!(catalog.get("One apple"), "Ett äpple");
    }

    #[test]
    fn test_out_of_range_plural_index_is_skipped() {
        let po_content = format!(
            "msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[{}] \"x\"\n\"more\"\nmsgstr[1000000000000] \"y\"\nmsgstr[0] \"z\"\n",
            usize::MAX
        );

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_n("a", "b", 1), "z");
        assert_eq!(catalog.get_n("a", "b", 2), "b");
    }

    #[test]
    fn test_parse_multiline_string() {
        let po_content = r#"
msgid ""
"This is a long "
"message that spans "
"multiple lines"
msgstr "Ceci est un long "
"message qui s'étend "
"sur plusieurs lignes"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(
            catalog.get("This is a long message that spans multiple lines"),
            "Ceci est un long message qui s'étend sur plusieurs lignes"
        );
    }

    #[test]
    fn test_parse_escape_sequences() {
        let po_content = r#"
msgid "Line 1\nLine 2\tTabbed \"quoted\""
msgstr "Ligne 1\nLigne 2\tTabulée \"citée\""
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(
            catalog.get("Line 1\nLine 2\tTabbed \"quoted\""),
            "Ligne 1\nLigne 2\tTabulée \"citée\""
        );
    }

    #[test]
    fn test_parse_header() {
        let po_content = r#"
msgid ""
msgstr ""
"Language: fr\n"
"Language-Team: French <fr@example.org>\n"
"Plural-Forms: nplurals=2; plural=(n > 1);\n"

msgid "item"
msgid_plural "items"
msgstr[0] "article"
msgstr[1] "articles"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.header("Language"), Some("fr"));
        assert_eq!(catalog.header("Language-Team"), Some("French <fr@example.org>"));
        assert_eq!(catalog.plural_rule().index(0), Some(0));
        assert_eq!(catalog.get_n("item", "items", 0), "article");
        // the header is never returned as a translation of the empty string
        assert_eq!(catalog.get(""), "");
    }

    #[test]
    fn test_unparsable_plural_header_keeps_default_rule() {
        let po_content = r#"
msgid ""
msgstr "Plural-Forms: nplurals=two; plural=n;\n"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.plural_rule(), &PluralRule::default());
    }

    #[test]
    fn test_parse_with_comments_and_fuzzy() {
        let po_content = r#"
# Translator comment
#. Extracted comment
#: reference.py:10
msgid "Hello"
msgstr "Bonjour"

#, fuzzy, python-format
msgid "Guess"
msgstr "Devinette"

#~ msgid "Obsolete"
#~ msgstr "Obsolète"
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert_eq!(catalog.get("Hello"), "Bonjour");
        assert_eq!(catalog.get("Guess"), "Guess");
        assert_eq!(catalog.get("Obsolete"), "Obsolete");
    }

    #[test]
    fn test_untranslated_entries_are_not_stored() {
        let po_content = r#"
msgid "Hello"
msgstr ""
"#;

        let catalog = parse_po(po_content.as_bytes());
        assert!(catalog.is_empty());
        assert_eq!(catalog.get("Hello"), "Hello");
    }

    #[test]
    fn test_parse_empty_file() {
        let catalog = parse_po(b"");
        assert!(catalog.is_empty());
        assert_eq!(catalog.get("Hello"), "Hello");
    }

    #[test]
    fn test_unescape_string() {
        assert_eq!(unescape_string("Hello\\nWorld"), "Hello\nWorld");
        assert_eq!(unescape_string("Tab\\there"), "Tab\there");
        assert_eq!(unescape_string("Quote\\\"here"), "Quote\"here");
        assert_eq!(unescape_string("Backslash\\\\here"), "Backslash\\here");
        assert_eq!(unescape_string("Unknown\\x"), "Unknown\\x");
    }
}
