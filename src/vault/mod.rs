//! Vault abstraction: where notes live and how changes arrive.
//!
//! The engine never touches the filesystem directly. A host hands it a
//! [`NoteSource`] for enumeration and reads, and feeds it [`VaultEvent`]s
//! as files change. Hosts that track window focus can additionally deliver
//! a focus-lost signal; hosts without that capability simply never send it.

use crossbeam_channel::{Receiver, Sender, unbounded};
use thiserror::Error;

pub mod fs;
pub mod memory;

pub use fs::FsVault;
pub use memory::MemoryVault;

/// Errors a note source can produce for a single note.
///
/// These stay separate from the engine error type because the engine reacts
/// to them differently: `NotFound` means the note is gone and must leave the
/// index, `Unreadable` means the note stays pending and is retried later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The note does not exist in the vault.
    #[error("note not found: {path}")]
    NotFound {
        /// Vault-relative path of the missing note.
        path: String,
    },

    /// The note exists but its content could not be read.
    #[error("note unreadable: {path} ({reason})")]
    Unreadable {
        /// Vault-relative path of the note.
        path: String,
        /// Human-readable reason from the underlying source.
        reason: String,
    },
}

/// A source of note content.
///
/// Paths are vault-relative with `/` separators, and they are the identity
/// of a note everywhere in the engine.
pub trait NoteSource: Send + Sync {
    /// Enumerate every note path in the vault.
    fn list_notes(&self) -> Result<Vec<String>, SourceError>;

    /// Read the full content of one note.
    fn read_note(&self, path: &str) -> Result<String, SourceError>;
}

/// A change notification from the host about one vault path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// A file appeared.
    Created(String),

    /// A file was removed.
    Deleted(String),

    /// A file's content changed.
    Modified(String),

    /// A file moved from `old` to `new`.
    Renamed {
        /// Path before the rename.
        old: String,
        /// Path after the rename.
        new: String,
    },
}

impl VaultEvent {
    /// The path this event is about. Renames report the new path.
    pub fn path(&self) -> &str {
        match self {
            VaultEvent::Created(path)
            | VaultEvent::Deleted(path)
            | VaultEvent::Modified(path) => path,
            VaultEvent::Renamed { new, .. } => new,
        }
    }
}

/// A signal delivered to the engine over the host channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultSignal {
    /// A vault change notification.
    Event(VaultEvent),

    /// The host window lost focus.
    FocusLost,
}

/// Create an unbounded channel for delivering signals to the engine.
///
/// The sender side lives with the host's file watcher; the receiver is
/// drained by the engine one signal at a time, preserving arrival order.
pub fn signal_channel() -> (Sender<VaultSignal>, Receiver<VaultSignal>) {
    unbounded()
}
