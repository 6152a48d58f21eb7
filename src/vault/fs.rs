//! Filesystem-backed note source.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::vault::{NoteSource, SourceError};

/// A note source rooted at a directory on disk.
///
/// Paths are reported relative to the root with `/` separators regardless
/// of platform, so they can be compared against event paths and stored as
/// note identities. Hidden directories (leading dot, e.g. vault metadata
/// folders) are skipped during enumeration.
///
/// Reads are lossy: content that is not valid UTF-8 still indexes, with
/// invalid sequences replaced. Only I/O failures surface as errors.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Create a vault rooted at the given directory.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        FsVault { root: root.into() }
    }

    /// The vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_hidden(entry: &walkdir::DirEntry) -> bool {
        entry.depth() > 0
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with('.'))
    }

    fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let s = rel.to_string_lossy();
        if std::path::MAIN_SEPARATOR == '/' {
            s.into_owned()
        } else {
            s.replace(std::path::MAIN_SEPARATOR, "/")
        }
    }
}

impl NoteSource for FsVault {
    fn list_notes(&self) -> Result<Vec<String>, SourceError> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !Self::is_hidden(e))
        {
            let entry = entry.map_err(|err| SourceError::Unreadable {
                path: self.root.to_string_lossy().into_owned(),
                reason: err.to_string(),
            })?;
            if entry.file_type().is_file() {
                paths.push(self.relative_path(entry.path()));
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn read_note(&self, path: &str) -> Result<String, SourceError> {
        let full = self.root.join(path);
        match std::fs::read(&full) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(SourceError::NotFound {
                path: path.to_string(),
            }),
            Err(err) => Err(SourceError::Unreadable {
                path: path.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}
