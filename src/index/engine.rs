//! The in-memory inverted index over a note vault.
//!
//! [`IndexEngine`] owns all index state behind a single `RwLock`. Every
//! mutation runs under one write guard, so readers either see a note fully
//! indexed or not at all; a query takes one read guard for its whole run
//! and gets a consistent view. There is no partial visibility in between.

use std::sync::Arc;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, note_analyzer};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::posting::{Posting, PostingList};
use crate::index::record::{NoteRecord, TermOccurrences};

/// Aggregate statistics about the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of indexed notes.
    pub note_count: usize,

    /// Number of distinct terms with at least one posting.
    pub term_count: usize,

    /// Total number of postings across all terms.
    pub posting_count: usize,

    /// Sum of content token counts over all notes.
    pub total_tokens: u64,

    /// Average content length in tokens.
    pub avg_note_tokens: f32,

    /// Mutation counter, incremented once per add/update/remove.
    pub generation: u64,

    /// Wall-clock time of the most recent mutation, if any.
    pub last_modified: Option<DateTime<Utc>>,
}

/// All mutable index state, guarded by the engine's lock.
#[derive(Debug, Default)]
pub(crate) struct IndexInner {
    records: AHashMap<u32, NoteRecord>,
    ids_by_path: AHashMap<String, u32>,
    terms: AHashMap<String, PostingList>,
    next_id: u32,
    generation: u64,
    total_tokens: u64,
    last_modified: Option<DateTime<Utc>>,
}

impl IndexInner {
    pub(crate) fn note_count(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn avg_token_count(&self) -> f32 {
        if self.records.is_empty() {
            0.0
        } else {
            self.total_tokens as f32 / self.records.len() as f32
        }
    }

    pub(crate) fn posting_list(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    pub(crate) fn terms(&self) -> impl Iterator<Item = &String> {
        self.terms.keys()
    }

    pub(crate) fn record(&self, note_id: u32) -> Option<&NoteRecord> {
        self.records.get(&note_id)
    }

    pub(crate) fn id_of(&self, path: &str) -> Option<u32> {
        self.ids_by_path.get(path).copied()
    }

    /// Every posting must point at a live record, no posting list may be
    /// empty, and the path map must mirror the record map.
    fn check_consistency(&self) -> bool {
        self.ids_by_path.len() == self.records.len()
            && self.terms.values().all(|list| {
                !list.is_empty() && list.iter().all(|p| self.records.contains_key(&p.note_id))
            })
    }
}

/// The index engine: analyzed notes, postings, and their lock.
pub struct IndexEngine {
    analyzer: Arc<dyn Analyzer>,
    inner: RwLock<IndexInner>,
}

impl IndexEngine {
    /// Create an empty index with the default note analyzer.
    pub fn new() -> Self {
        IndexEngine::with_analyzer(Arc::new(note_analyzer()))
    }

    /// Create an empty index with a custom analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        IndexEngine {
            analyzer,
            inner: RwLock::new(IndexInner::default()),
        }
    }

    /// The analyzer notes and queries are run through.
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Take a read guard over the index for the duration of a query.
    pub(crate) fn snapshot(&self) -> RwLockReadGuard<'_, IndexInner> {
        self.inner.read()
    }

    /// Index a note, replacing any previous version of it.
    ///
    /// Analysis runs outside the lock; the write guard covers exactly the
    /// purge of the old postings and the insert of the new ones, so readers
    /// never observe a half-updated note. Old and new positions are never
    /// merged: the previous posting set is purged first, then the new one
    /// is inserted.
    pub fn add_or_update(&self, path: &str, content: &str, config: &SearchConfig) -> Result<()> {
        let (mut record, occurrences) = NoteRecord::build(path, content, self.analyzer.as_ref())?;

        let mut inner = self.inner.write();
        let note_id = match inner.ids_by_path.get(path).copied() {
            Some(id) => {
                if let Some(old) = inner.records.remove(&id) {
                    inner.total_tokens -= u64::from(old.token_count);
                    record.revision = old.revision + 1;
                    purge_postings(&mut inner.terms, &old.indexed_terms, id);
                }
                id
            }
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                inner.ids_by_path.insert(path.to_string(), id);
                id
            }
        };

        for (term, occ) in occurrences {
            let posting = build_posting(note_id, occ, config.scoring.title_boost);
            inner.terms.entry(term).or_default().upsert(posting);
        }

        inner.total_tokens += u64::from(record.token_count);
        inner.records.insert(note_id, record);
        inner.generation += 1;
        inner.last_modified = Some(Utc::now());
        debug_assert!(inner.check_consistency());
        Ok(())
    }

    /// Remove a note and every posting that references it.
    ///
    /// Idempotent: removing an unindexed path is a no-op returning `false`.
    pub fn remove(&self, path: &str) -> bool {
        let mut inner = self.inner.write();
        let Some(id) = inner.ids_by_path.remove(path) else {
            return false;
        };
        if let Some(old) = inner.records.remove(&id) {
            inner.total_tokens -= u64::from(old.token_count);
            purge_postings(&mut inner.terms, &old.indexed_terms, id);
        }
        inner.generation += 1;
        inner.last_modified = Some(Utc::now());
        debug_assert!(inner.check_consistency());
        true
    }

    /// Whether a path is currently indexed.
    pub fn contains(&self, path: &str) -> bool {
        self.inner.read().ids_by_path.contains_key(path)
    }

    /// Number of indexed notes.
    pub fn note_count(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Snapshot of aggregate index statistics.
    pub fn stats(&self) -> IndexStats {
        let inner = self.inner.read();
        IndexStats {
            note_count: inner.records.len(),
            term_count: inner.terms.len(),
            posting_count: inner.terms.values().map(|list| list.len()).sum(),
            total_tokens: inner.total_tokens,
            avg_note_tokens: inner.avg_token_count(),
            generation: inner.generation,
            last_modified: inner.last_modified,
        }
    }
}

impl Default for IndexEngine {
    fn default() -> Self {
        IndexEngine::new()
    }
}

fn purge_postings(
    terms: &mut AHashMap<String, PostingList>,
    indexed_terms: &[String],
    note_id: u32,
) {
    for term in indexed_terms {
        if let Some(list) = terms.get_mut(term) {
            list.remove(note_id);
            if list.is_empty() {
                terms.remove(term);
            }
        }
    }
}

fn build_posting(note_id: u32, occ: TermOccurrences, title_boost: f32) -> Posting {
    let content = occ.positions.len() as u32;
    let frequency = content + occ.title_count;
    let weight = if occ.title_count == 0 {
        1.0
    } else {
        (content as f32 + title_boost * occ.title_count as f32) / frequency as f32
    };
    Posting {
        note_id,
        frequency,
        positions: occ.positions,
        weight,
    }
}
