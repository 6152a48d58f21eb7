//! Relevance scoring for ranked search.
//!
//! Per-term scores are BM25: an inverse-document-frequency component from
//! how rare the term is across the vault, and a saturating term-frequency
//! component normalized by note length. Notes whose matched terms sit close
//! together earn a proximity bonus on top.

use crate::config::ScoringConfig;

/// BM25 scoring context for one search, frozen from the index snapshot.
#[derive(Debug, Clone)]
pub struct Bm25 {
    total_docs: usize,
    avg_doc_len: f32,
    k1: f32,
    b: f32,
}

impl Bm25 {
    /// Create a scorer over an index with the given shape.
    pub fn new(total_docs: usize, avg_doc_len: f32, scoring: &ScoringConfig) -> Self {
        Bm25 {
            total_docs,
            avg_doc_len,
            k1: scoring.k1,
            b: scoring.b,
        }
    }

    /// Inverse document frequency of a term seen in `doc_freq` notes.
    ///
    /// The `1 +` inside the log keeps idf positive even for terms present
    /// in more than half the vault, which small vaults hit constantly.
    pub fn idf(&self, doc_freq: usize) -> f32 {
        if doc_freq == 0 || self.total_docs == 0 {
            return 0.0;
        }
        let n = self.total_docs as f32;
        let df = doc_freq as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Saturating term-frequency component, normalized by note length.
    pub fn tf(&self, term_freq: f32, doc_len: u32) -> f32 {
        if term_freq <= 0.0 {
            return 0.0;
        }
        let norm = if self.avg_doc_len > 0.0 {
            1.0 - self.b + self.b * (doc_len as f32 / self.avg_doc_len)
        } else {
            1.0
        };
        (term_freq * (self.k1 + 1.0)) / (term_freq + self.k1 * norm)
    }

    /// Full BM25 score for one term in one note.
    pub fn score(&self, doc_freq: usize, term_freq: f32, doc_len: u32) -> f32 {
        self.idf(doc_freq) * self.tf(term_freq, doc_len)
    }
}

/// Smallest token window covering at least one position from every list.
///
/// Returns `None` when fewer than two lists are given or any list is
/// empty. Positions come from distinct terms, so no two lists share a
/// position and the window is always at least as wide as the list count.
pub fn minimal_window(position_lists: &[&[u32]]) -> Option<u32> {
    let k = position_lists.len();
    if k < 2 || position_lists.iter().any(|list| list.is_empty()) {
        return None;
    }

    let mut events: Vec<(u32, usize)> = Vec::new();
    for (list_idx, list) in position_lists.iter().enumerate() {
        for &pos in *list {
            events.push((pos, list_idx));
        }
    }
    events.sort_unstable();

    let mut counts = vec![0usize; k];
    let mut covered = 0;
    let mut left = 0;
    let mut best: Option<u32> = None;

    for right in 0..events.len() {
        let (pos_r, list_r) = events[right];
        if counts[list_r] == 0 {
            covered += 1;
        }
        counts[list_r] += 1;

        while covered == k {
            let (pos_l, list_l) = events[left];
            let span = pos_r - pos_l + 1;
            best = Some(best.map_or(span, |b| b.min(span)));
            counts[list_l] -= 1;
            if counts[list_l] == 0 {
                covered -= 1;
            }
            left += 1;
        }
    }
    best
}

/// Proximity factor in `(0, 1]`: 1.0 when all matched terms are adjacent,
/// shrinking as the tightest window spreads out. 0.0 when no window exists.
pub fn proximity_factor(position_lists: &[&[u32]]) -> f32 {
    match minimal_window(position_lists) {
        Some(window) if window > 0 => position_lists.len() as f32 / window as f32,
        _ => 0.0,
    }
}
