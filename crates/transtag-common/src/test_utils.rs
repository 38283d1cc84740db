//! Test utilities and shared fixtures for the transtag workspace.
//!
//! Locale trees, sample catalogs and a small MO encoder used by the unit and
//! integration tests of the other crates.

use std::sync::Once;

#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        // Another test harness may already own the global subscriber.
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// No-op version when tracing-subscriber is not available
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {
    INIT.call_once(|| {});
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Sample gettext catalogs laid out as `<root>/<language>/<domain>.po`.
pub mod locale_fixtures {
    use std::fs;
    use std::path::Path;

    /// Swedish default domain: plain, context and plural entries.
    pub const SV_SE_DEFAULT_PO: &str = r#"# Swedish translations
msgid ""
msgstr ""
"Language: sv_SE\n"
"Language-Team: Swedish <sv@example.org>\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

msgid "Hello world!"
msgstr "Hej världen!"

msgctxt "greeting"
msgid "Hello world!"
msgstr "Hallå världen!"

msgid "One apple"
msgid_plural "Many apples"
msgstr[0] "Ett äpple"
msgstr[1] "Många äpplen"

msgctxt "fruit"
msgid "One apple"
msgid_plural "Many apples"
msgstr[0] "Ett äpple (frukt)"
msgstr[1] "Många äpplen (frukt)"

msgid "Welcome, {{ name }}!"
msgstr "Välkommen, {{ name }}!"

msgid "You have {{ cnt }} message."
msgid_plural "You have {{ cnt }} messages."
msgstr[0] "Du har {{ cnt }} meddelande."
msgstr[1] "Du har {{ cnt }} meddelanden."
"#;

    /// Swedish `other` domain.
    pub const SV_SE_OTHER_PO: &str = r#"msgid ""
msgstr ""
"Language: sv_SE\n"

msgid "Hello world!"
msgstr "Hej från other!"
"#;

    /// British English, `other` domain only.
    pub const EN_GB_OTHER_PO: &str = r#"msgid ""
msgstr ""
"Language: en_GB\n"

msgid "Hello world!"
msgstr "Hello from the other domain!"
"#;

    /// Writes one catalog file below `root`, creating the language directory.
    pub fn write_catalog(root: &Path, language: &str, file_name: &str, contents: &[u8]) {
        let dir = root.join(language);
        fs::create_dir_all(&dir).expect("Failed to create language directory");
        fs::write(dir.join(file_name), contents).expect("Failed to write catalog file");
    }

    /// Writes the standard `sv_SE` (default + other) and `en_GB` (other) tree.
    pub fn write_standard_tree(root: &Path) {
        write_catalog(root, "sv_SE", "default.po", SV_SE_DEFAULT_PO.as_bytes());
        write_catalog(root, "sv_SE", "other.po", SV_SE_OTHER_PO.as_bytes());
        write_catalog(root, "en_GB", "other.po", EN_GB_OTHER_PO.as_bytes());
    }
}

/// Builds binary MO catalogs in memory.
pub mod mo_fixtures {
    /// One catalog entry to encode.
    #[derive(Debug, Clone, Default)]
    pub struct MoEntry<'a> {
        /// Optional msgctxt.
        pub context: Option<&'a str>,
        /// The msgid; empty for the header.
        pub msgid: &'a str,
        /// Optional msgid_plural.
        pub msgid_plural: Option<&'a str>,
        /// Translations; one for singular entries, one per plural form otherwise.
        pub msgstr: Vec<&'a str>,
    }

    impl<'a> MoEntry<'a> {
        /// A plain singular entry.
        pub fn singular(msgid: &'a str, msgstr: &'a str) -> Self {
            Self {
                msgid,
                msgstr: vec![msgstr],
                ..Self::default()
            }
        }

        /// The header entry carrying `headers` as its translation.
        pub fn header(headers: &'a str) -> Self {
            Self::singular("", headers)
        }
    }

    /// Encodes `entries` as a little-endian MO file without a hash table.
    pub fn encode_mo(entries: &[MoEntry<'_>]) -> Vec<u8> {
        encode(entries, false)
    }

    /// Encodes `entries` as a big-endian MO file without a hash table.
    pub fn encode_mo_big_endian(entries: &[MoEntry<'_>]) -> Vec<u8> {
        encode(entries, true)
    }

    fn encode(entries: &[MoEntry<'_>], big_endian: bool) -> Vec<u8> {
        let put = |out: &mut Vec<u8>, value: u32| {
            if big_endian {
                out.extend_from_slice(&value.to_be_bytes());
            } else {
                out.extend_from_slice(&value.to_le_bytes());
            }
        };

        let originals: Vec<Vec<u8>> = entries
            .iter()
            .map(|entry| {
                let mut key = Vec::new();
                if let Some(context) = entry.context {
                    key.extend_from_slice(context.as_bytes());
                    key.push(0x04);
                }
                key.extend_from_slice(entry.msgid.as_bytes());
                if let Some(plural) = entry.msgid_plural {
                    key.push(0);
                    key.extend_from_slice(plural.as_bytes());
                }
                key
            })
            .collect();
        let translations: Vec<Vec<u8>> = entries
            .iter()
            .map(|entry| entry.msgstr.join("\0").into_bytes())
            .collect();

        let count = u32::try_from(entries.len()).expect("too many entries");
        let header_len = 28u32;
        let originals_offset = header_len;
        let translations_offset = originals_offset + count * 8;
        let mut data_offset = translations_offset + count * 8;

        let mut out = Vec::new();
        put(&mut out, 0x9504_12de);
        put(&mut out, 0);
        put(&mut out, count);
        put(&mut out, originals_offset);
        put(&mut out, translations_offset);
        put(&mut out, 0);
        put(&mut out, data_offset);

        let mut data = Vec::new();
        let mut table = |strings: &[Vec<u8>], out: &mut Vec<u8>| {
            for string in strings {
                let len = u32::try_from(string.len()).expect("string too long");
                put(out, len);
                put(out, data_offset);
                data.extend_from_slice(string);
                data.push(0);
                data_offset += len + 1;
            }
        };
        table(&originals, &mut out);
        table(&translations, &mut out);

        out.extend_from_slice(&data);
        out
    }
}
