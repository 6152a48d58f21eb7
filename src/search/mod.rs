//! Query execution: fuzzy expansion, scoring, excerpts, and the searcher.
//!
//! A search runs entirely under one read guard on the index, so every hit
//! reflects the same index generation. Query terms expand to index terms
//! (exact, prefix, fuzzy), expansions are scored per note, and the ranked
//! hits carry highlighted excerpts cut from the original note text.

use serde::{Deserialize, Serialize};

pub mod excerpt;
pub mod fuzzy;
pub mod scorer;
pub mod searcher;

pub use excerpt::build_excerpts;
pub use fuzzy::{MatchKind, TermMatch, expand_term};
pub use scorer::{Bm25, proximity_factor};
pub use searcher::Searcher;

/// What part of the vault a search covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Search every indexed note.
    Vault,

    /// Search a single note by path.
    Note(String),
}

/// A highlighted byte range within an excerpt's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Start byte offset, relative to the excerpt text.
    pub start: usize,

    /// End byte offset (exclusive), relative to the excerpt text.
    pub end: usize,
}

/// A contiguous slice of a note shown as context for a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excerpt {
    /// Byte offset of `text` within the note content.
    pub start: usize,

    /// The excerpt text, cut from the original note.
    pub text: String,

    /// Matched term occurrences within `text`.
    pub spans: Vec<MatchSpan>,
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Vault-relative path of the matching note.
    pub path: String,

    /// Display title of the note.
    pub title: String,

    /// Aggregate relevance score.
    pub score: f32,

    /// Index terms that matched, sorted.
    pub matched_terms: Vec<String>,

    /// Highlighted excerpts, best first.
    pub excerpts: Vec<Excerpt>,
}
