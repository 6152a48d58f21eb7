//! The document record store and inverted index.
//!
//! This module owns the canonical index state: one [`NoteRecord`] per
//! indexed note plus a term map of [`PostingList`]s, all guarded by the
//! [`IndexEngine`]'s single lock. Updates are strict replace-then-insert;
//! removals purge every trace of a note.

pub mod engine;
pub mod posting;
pub mod record;

pub use engine::{IndexEngine, IndexStats};
pub use posting::{Posting, PostingList};
pub use record::{NoteRecord, TermOccurrences, derive_title};
