//! Fuzzy expansion of query terms against the index vocabulary.
//!
//! Each query term expands to the index terms it could mean: itself if
//! present, terms it prefixes, and terms within a bounded edit distance
//! (Damerau-Levenshtein, so transpositions count as one edit). The edit
//! allowance scales with term length and the expansion set is capped, both
//! per [`FuzzyConfig`].

use crate::config::FuzzyConfig;
use crate::index::engine::IndexInner;
use crate::util::levenshtein::damerau_levenshtein_within;

/// How a query term matched an index term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The index term equals the query term.
    Exact,

    /// The query term is a proper prefix of the index term.
    Prefix,

    /// The index term is within the allowed edit distance.
    Fuzzy,
}

/// One index term matched by a query term.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatch {
    /// The matched index term.
    pub term: String,

    /// How it matched.
    pub kind: MatchKind,

    /// Edit distance to the query term (0 for exact and prefix).
    pub edit_distance: u32,

    /// Score weight of this match, strongest kind highest.
    pub weight: f32,
}

/// Expand one analyzed query term against the index vocabulary.
///
/// Results are sorted strongest first (exact, then prefix, then fuzzy by
/// rising edit distance) with ties broken by term text, then capped at
/// `fuzzy.max_expansions`. The ordering makes expansion deterministic for
/// a given index state.
pub fn expand_term(query_term: &str, inner: &IndexInner, fuzzy: &FuzzyConfig) -> Vec<TermMatch> {
    let query_chars = query_term.chars().count();
    let max_edits = fuzzy.max_edits_for(query_chars);
    let allow_prefix = fuzzy.prefix_allowed(query_chars);

    let mut matches = Vec::new();
    if inner.posting_list(query_term).is_some() {
        matches.push(TermMatch {
            term: query_term.to_string(),
            kind: MatchKind::Exact,
            edit_distance: 0,
            weight: fuzzy.exact_weight,
        });
    }

    if allow_prefix || max_edits > 0 {
        for term in inner.terms() {
            if term == query_term {
                continue;
            }
            if allow_prefix && term.starts_with(query_term) {
                matches.push(TermMatch {
                    term: term.clone(),
                    kind: MatchKind::Prefix,
                    edit_distance: 0,
                    weight: fuzzy.prefix_weight,
                });
                continue;
            }
            if max_edits > 0 {
                if term.chars().count().abs_diff(query_chars) > max_edits {
                    continue;
                }
                if let Some(distance) = damerau_levenshtein_within(query_term, term, max_edits) {
                    matches.push(TermMatch {
                        term: term.clone(),
                        kind: MatchKind::Fuzzy,
                        edit_distance: distance as u32,
                        weight: fuzzy.fuzzy_weight / distance as f32,
                    });
                }
            }
        }
    }

    matches.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.term.cmp(&b.term)));
    matches.truncate(fuzzy.max_expansions);
    matches
}
