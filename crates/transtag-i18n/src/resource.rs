//! Read-only access to a locale tree

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One entry of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// File or directory name, without the parent path
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

/// A read-only tree of catalog files.
///
/// Paths are relative to the root of the source. Listings are returned in
/// whatever order the backing store yields; the translator sorts them.
pub trait CatalogSource {
    /// List the entries of the directory at `path`
    fn list(&self, path: &Path) -> io::Result<Vec<SourceEntry>>;

    /// Read the file at `path`
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Where `path` lives, for error messages
    fn describe(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Catalog files on the local filesystem below a base directory
#[derive(Debug, Clone)]
pub struct FsCatalogSource {
    base_dir: PathBuf,
}

impl FsCatalogSource {
    /// Create a source rooted at `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Get the base directory for catalogs
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl CatalogSource for FsCatalogSource {
    fn list(&self, path: &Path) -> io::Result<Vec<SourceEntry>> {
        fs::read_dir(self.base_dir.join(path))?
            .map(|entry| {
                let entry = entry?;
                Ok(SourceEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    // follows symlinks, so linked language directories load
                    is_dir: entry.path().is_dir(),
                })
            })
            .collect()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.base_dir.join(path))
    }

    fn describe(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }
}
