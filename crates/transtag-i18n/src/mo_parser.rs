//! Gettext .mo file parser
//!
//! Reads the binary catalog format produced by `msgfmt`: a fixed header,
//! two tables of (length, offset) pairs and the NUL-terminated strings they
//! point at. Both byte orders are accepted.

use crate::catalog::MessageCatalog;
use thiserror::Error;

const MAGIC: u32 = 0x9504_12de;
const HEADER_LEN: usize = 28;

/// Separates msgctxt from msgid in an original string
const CONTEXT_SEPARATOR: char = '\u{4}';

/// Errors raised while reading a binary catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoParseError {
    /// Shorter than the fixed header
    #[error("file is {0} bytes, too short for an MO header")]
    TooShort(usize),

    /// Neither byte order yields the MO magic number
    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),

    /// Major revision other than 0 or 1
    #[error("unsupported MO revision {0:#x}")]
    UnsupportedRevision(u32),

    /// A table entry points outside the file
    #[error("string table entry {index} points outside the file")]
    OutOfBounds { index: usize },
}

#[derive(Debug, Clone, Copy)]
enum ByteOrder {
    Little,
    Big,
}

struct MoReader<'a> {
    bytes: &'a [u8],
    order: ByteOrder,
}

impl<'a> MoReader<'a> {
    fn word(&self, offset: usize) -> Option<u32> {
        let raw: [u8; 4] = self.bytes.get(offset..offset + 4)?.try_into().ok()?;
        Some(match self.order {
            ByteOrder::Little => u32::from_le_bytes(raw),
            ByteOrder::Big => u32::from_be_bytes(raw),
        })
    }

    fn offset(&self, offset: usize) -> Option<usize> {
        self.word(offset).and_then(|word| usize::try_from(word).ok())
    }

    /// The string described by the table entry at `table + index * 8`
    fn string(&self, table: usize, index: usize) -> Result<&'a [u8], MoParseError> {
        let entry = table + index * 8;
        let out_of_bounds = MoParseError::OutOfBounds { index };
        let len = self.offset(entry).ok_or_else(|| out_of_bounds.clone())?;
        let start = self.offset(entry + 4).ok_or_else(|| out_of_bounds.clone())?;
        self.bytes
            .get(start..start.checked_add(len).ok_or_else(|| out_of_bounds.clone())?)
            .ok_or(out_of_bounds)
    }
}

/// Parse the contents of a .mo file
pub fn parse_mo(bytes: &[u8]) -> Result<MessageCatalog, MoParseError> {
    if bytes.len() < HEADER_LEN {
        return Err(MoParseError::TooShort(bytes.len()));
    }

    let mut reader = MoReader {
        bytes,
        order: ByteOrder::Little,
    };
    let magic = reader.word(0).ok_or(MoParseError::TooShort(bytes.len()))?;
    if magic != MAGIC {
        reader.order = ByteOrder::Big;
        if reader.word(0) != Some(MAGIC) {
            return Err(MoParseError::BadMagic(magic));
        }
    }

    let revision = reader.word(4).unwrap_or_default();
    if revision >> 16 > 1 {
        return Err(MoParseError::UnsupportedRevision(revision));
    }

    let too_short = || MoParseError::TooShort(bytes.len());
    let count = reader.offset(8).ok_or_else(too_short)?;
    let originals = reader.offset(12).ok_or_else(too_short)?;
    let translations = reader.offset(16).ok_or_else(too_short)?;

    let mut catalog = MessageCatalog::new();
    for index in 0..count {
        let original = String::from_utf8_lossy(reader.string(originals, index)?);
        let translated = String::from_utf8_lossy(reader.string(translations, index)?);
        add_entry(&mut catalog, &original, &translated);
    }

    Ok(catalog)
}

fn add_entry(catalog: &mut MessageCatalog, original: &str, translated: &str) {
    let (context, key) = match original.split_once(CONTEXT_SEPARATOR) {
        Some((context, key)) => (Some(context), key),
        None => (None, original),
    };
    let (msgid, plural) = match key.split_once('\0') {
        Some((msgid, plural)) => (msgid, Some(plural)),
        None => (key, None),
    };

    if msgid.is_empty() && context.is_none() {
        catalog.apply_header(translated);
        return;
    }

    let forms = if plural.is_some() {
        translated.split('\0').map(str::to_string).collect()
    } else {
        vec![translated.to_string()]
    };
    catalog.add_entry(context.map(str::to_string), msgid, forms);
}
