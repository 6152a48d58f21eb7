//! In-memory note source for tests and embedded hosts.

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;

use crate::vault::{NoteSource, SourceError};

/// A note source backed by an in-memory map.
///
/// The map is internally locked so a test can mutate the vault while the
/// engine holds a shared reference to it. Mutations here do not notify the
/// engine; the host still has to deliver the matching `VaultEvent`.
#[derive(Debug, Default)]
pub struct MemoryVault {
    notes: RwLock<AHashMap<String, String>>,
    unreadable: RwLock<AHashSet<String>>,
}

impl MemoryVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        MemoryVault::default()
    }

    /// Create a vault from an iterator of `(path, content)` pairs.
    pub fn from_notes<I, P, C>(notes: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let vault = MemoryVault::new();
        for (path, content) in notes {
            vault.insert(path, content);
        }
        vault
    }

    /// Insert or overwrite a note.
    pub fn insert<P: Into<String>, C: Into<String>>(&self, path: P, content: C) {
        self.notes.write().insert(path.into(), content.into());
    }

    /// Remove a note. Returns whether it existed.
    pub fn remove(&self, path: &str) -> bool {
        self.unreadable.write().remove(path);
        self.notes.write().remove(path).is_some()
    }

    /// Move a note to a new path. Returns whether the old path existed.
    pub fn rename(&self, old: &str, new: &str) -> bool {
        let mut notes = self.notes.write();
        match notes.remove(old) {
            Some(content) => {
                notes.insert(new.to_string(), content);
                true
            }
            None => false,
        }
    }

    /// Make reads of a note fail with `SourceError::Unreadable`.
    pub fn mark_unreadable(&self, path: &str) {
        self.unreadable.write().insert(path.to_string());
    }

    /// Make reads of a note succeed again.
    pub fn clear_unreadable(&self, path: &str) {
        self.unreadable.write().remove(path);
    }

    /// Number of notes currently stored.
    pub fn len(&self) -> usize {
        self.notes.read().len()
    }

    /// Whether the vault holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.read().is_empty()
    }
}

impl NoteSource for MemoryVault {
    fn list_notes(&self) -> Result<Vec<String>, SourceError> {
        let mut paths: Vec<String> = self.notes.read().keys().cloned().collect();
        paths.sort();
        Ok(paths)
    }

    fn read_note(&self, path: &str) -> Result<String, SourceError> {
        if self.unreadable.read().contains(path) {
            return Err(SourceError::Unreadable {
                path: path.to_string(),
                reason: "marked unreadable".to_string(),
            });
        }
        self.notes
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                path: path.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_read() {
        let vault = MemoryVault::new();
        vault.insert("a.md", "alpha");
        assert_eq!(vault.read_note("a.md").unwrap(), "alpha");
    }

    #[test]
    fn test_missing_note_is_not_found() {
        let vault = MemoryVault::new();
        assert_eq!(
            vault.read_note("gone.md"),
            Err(SourceError::NotFound {
                path: "gone.md".to_string()
            })
        );
    }

    #[test]
    fn test_list_is_sorted() {
        let vault = MemoryVault::from_notes([("b.md", ""), ("a.md", ""), ("c.md", "")]);
        assert_eq!(vault.list_notes().unwrap(), vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn test_rename_moves_content() {
        let vault = MemoryVault::from_notes([("old.md", "body")]);
        assert!(vault.rename("old.md", "new.md"));
        assert_eq!(vault.read_note("new.md").unwrap(), "body");
        assert!(matches!(
            vault.read_note("old.md"),
            Err(SourceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_mark_unreadable() {
        let vault = MemoryVault::from_notes([("a.md", "alpha")]);
        vault.mark_unreadable("a.md");
        assert!(matches!(
            vault.read_note("a.md"),
            Err(SourceError::Unreadable { .. })
        ));
        vault.clear_unreadable("a.md");
        assert_eq!(vault.read_note("a.md").unwrap(), "alpha");
    }
}
