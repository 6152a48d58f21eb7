//! The query driver.
//!
//! A search analyzes the query with the same pipeline used at index time,
//! expands each query term against the vocabulary, scores expansions per
//! note, and ranks. The whole run holds one read guard on the index, so
//! results always reflect a single index generation.
//!
//! Ranking is deterministic: notes matching more distinct query terms come
//! first, then higher aggregate score, then path order. Per query term a
//! note is credited with its best expansion only, so "apple" matching both
//! `apple` and `apples` in one note does not double count.

use ahash::{AHashMap, AHashSet};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::IndexEngine;
use crate::search::excerpt::build_excerpts;
use crate::search::fuzzy::expand_term;
use crate::search::scorer::{Bm25, proximity_factor};
use crate::search::{SearchHit, SearchScope};

/// Executes queries against an index engine.
pub struct Searcher<'a> {
    engine: &'a IndexEngine,
}

/// Running totals for one candidate note.
#[derive(Debug, Default)]
struct Accumulator {
    score: f32,
    matched_query_terms: usize,
    matched_terms: AHashSet<String>,
    term_positions: Vec<Vec<u32>>,
}

/// Best expansion of one query term within one note.
#[derive(Debug, Default)]
struct TermHit {
    contribution: f32,
    positions: Vec<u32>,
    matched: AHashSet<String>,
}

impl<'a> Searcher<'a> {
    /// Create a searcher over the given engine.
    pub fn new(engine: &'a IndexEngine) -> Self {
        Searcher { engine }
    }

    /// Run a query and return ranked hits.
    ///
    /// An empty or all-punctuation query, or a scope naming an unindexed
    /// note, yields an empty result set rather than an error.
    pub fn search(
        &self,
        query: &str,
        scope: &SearchScope,
        config: &SearchConfig,
    ) -> Result<Vec<SearchHit>> {
        let query_terms = self.analyze_query(query)?;
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let inner = self.engine.snapshot();
        let scope_id = match scope {
            SearchScope::Vault => None,
            SearchScope::Note(path) => match inner.id_of(path) {
                Some(id) => Some(id),
                None => return Ok(Vec::new()),
            },
        };

        let bm25 = Bm25::new(inner.note_count(), inner.avg_token_count(), &config.scoring);
        let mut accumulators: AHashMap<u32, Accumulator> = AHashMap::new();

        for query_term in &query_terms {
            let expansions = expand_term(query_term, &inner, &config.fuzzy);
            if expansions.is_empty() {
                continue;
            }

            let mut per_note: AHashMap<u32, TermHit> = AHashMap::new();
            for expansion in &expansions {
                let Some(list) = inner.posting_list(&expansion.term) else {
                    continue;
                };
                let doc_freq = list.doc_frequency();
                for posting in list.iter() {
                    if scope_id.is_some_and(|id| id != posting.note_id) {
                        continue;
                    }
                    let Some(record) = inner.record(posting.note_id) else {
                        continue;
                    };
                    let contribution = expansion.weight
                        * bm25.score(doc_freq, posting.weighted_frequency(), record.token_count);

                    let hit = per_note.entry(posting.note_id).or_default();
                    hit.matched.insert(expansion.term.clone());
                    if contribution > hit.contribution {
                        hit.contribution = contribution;
                        hit.positions = posting.positions.clone();
                    }
                }
            }

            for (note_id, hit) in per_note {
                let acc = accumulators.entry(note_id).or_default();
                acc.score += hit.contribution;
                acc.matched_query_terms += 1;
                acc.matched_terms.extend(hit.matched);
                if !hit.positions.is_empty() {
                    acc.term_positions.push(hit.positions);
                }
            }
        }

        for acc in accumulators.values_mut() {
            if acc.term_positions.len() >= 2 {
                let lists: Vec<&[u32]> =
                    acc.term_positions.iter().map(|v| v.as_slice()).collect();
                let factor = proximity_factor(&lists);
                acc.score *= 1.0 + config.scoring.proximity_weight * factor;
            }
        }

        let mut ranked: Vec<(u32, Accumulator)> = accumulators.into_iter().collect();
        ranked.sort_by(|(id_a, a), (id_b, b)| {
            b.matched_query_terms
                .cmp(&a.matched_query_terms)
                .then_with(|| b.score.total_cmp(&a.score))
                .then_with(|| {
                    let path_a = inner.record(*id_a).map(|r| r.path.as_str()).unwrap_or("");
                    let path_b = inner.record(*id_b).map(|r| r.path.as_str()).unwrap_or("");
                    path_a.cmp(path_b)
                })
        });
        ranked.truncate(config.max_results);

        let mut hits = Vec::with_capacity(ranked.len());
        for (note_id, acc) in ranked {
            let Some(record) = inner.record(note_id) else {
                continue;
            };
            let excerpts = build_excerpts(record, &acc.matched_terms, &config.excerpt);
            let mut matched_terms: Vec<String> = acc.matched_terms.into_iter().collect();
            matched_terms.sort();
            hits.push(SearchHit {
                path: record.path.clone(),
                title: record.title.clone(),
                score: acc.score,
                matched_terms,
                excerpts,
            });
        }
        Ok(hits)
    }

    /// Analyze a query into distinct terms, preserving first-seen order.
    fn analyze_query(&self, query: &str) -> Result<Vec<String>> {
        let mut seen = AHashSet::new();
        let mut terms = Vec::new();
        for token in self.engine.analyzer().analyze(query)? {
            if seen.insert(token.text.clone()) {
                terms.push(token.text);
            }
        }
        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed(notes: &[(&str, &str)]) -> IndexEngine {
        let engine = IndexEngine::new();
        let config = SearchConfig::default();
        for (path, content) in notes {
            engine.add_or_update(path, content, &config).unwrap();
        }
        engine
    }

    fn search(engine: &IndexEngine, query: &str) -> Vec<SearchHit> {
        Searcher::new(engine)
            .search(query, &SearchScope::Vault, &SearchConfig::default())
            .unwrap()
    }

    #[test]
    fn test_more_distinct_terms_ranks_first() {
        let engine = indexed(&[
            ("apple.md", "apple pie recipes and apple cider"),
            ("banana.md", "banana bread with ripe banana"),
            ("smoothie.md", "blend apple banana and yogurt"),
        ]);
        let hits = search(&engine, "apple banana");

        assert_eq!(hits[0].path, "smoothie.md");
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_empty_query_yields_empty_results() {
        let engine = indexed(&[("a.md", "anything")]);
        assert!(search(&engine, "").is_empty());
        assert!(search(&engine, "   \t\n").is_empty());
        assert!(search(&engine, "?!,;").is_empty());
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let engine = indexed(&[("a.md", "completely unrelated words")]);
        assert!(search(&engine, "xylophone").is_empty());
    }

    #[test]
    fn test_fuzzy_matches_typo() {
        let engine = indexed(&[("inbox.md", "did you receive the package")]);
        let hits = search(&engine, "recieve");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matched_terms, vec!["receive"]);
    }

    #[test]
    fn test_query_normalization_matches_folded_terms() {
        let engine = indexed(&[("paris.md", "the cafe near the river")]);
        let hits = search(&engine, "CAFÉ");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_note_scope_restricts_results() {
        let engine = indexed(&[
            ("a.md", "shared term here"),
            ("b.md", "shared term there"),
        ]);
        let searcher = Searcher::new(&engine);
        let config = SearchConfig::default();

        let hits = searcher
            .search("shared", &SearchScope::Note("b.md".to_string()), &config)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "b.md");

        let hits = searcher
            .search("shared", &SearchScope::Note("missing.md".to_string()), &config)
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_proximity_breaks_ties() {
        // Same term frequencies and note lengths; only adjacency differs.
        let engine = indexed(&[
            ("spread.md", "apple one two three banana"),
            ("tight.md", "apple banana one two three"),
        ]);
        let hits = search(&engine, "apple banana");

        assert_eq!(hits[0].path, "tight.md");
        assert_eq!(hits[1].path, "spread.md");
    }

    #[test]
    fn test_title_match_outranks_body_match() {
        let engine = indexed(&[
            ("archive.md", "gardening is mentioned once here"),
            ("gardening.md", "tips for tomatoes and beans"),
        ]);
        let hits = search(&engine, "gardening");

        assert_eq!(hits[0].path, "gardening.md");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_path_breaks_remaining_ties() {
        let engine = indexed(&[
            ("b.md", "identical content words"),
            ("a.md", "identical content words"),
        ]);
        let hits = search(&engine, "identical");
        assert_eq!(hits[0].path, "a.md");
        assert_eq!(hits[1].path, "b.md");
    }

    #[test]
    fn test_max_results_cap() {
        let engine = IndexEngine::new();
        let config = SearchConfig::default();
        for i in 0..20 {
            engine
                .add_or_update(&format!("note{i:02}.md"), "common filler words", &config)
                .unwrap();
        }

        let mut capped = SearchConfig::default();
        capped.max_results = 5;
        let hits = Searcher::new(&engine)
            .search("common", &SearchScope::Vault, &capped)
            .unwrap();
        assert_eq!(hits.len(), 5);
    }

    #[test]
    fn test_hits_carry_excerpts_and_title() {
        let engine = indexed(&[("brew.md", "# Coffee Brewing\n\ngrind the beans fresh")]);
        let hits = search(&engine, "beans");

        assert_eq!(hits[0].title, "Coffee Brewing");
        assert!(!hits[0].excerpts.is_empty());
        let excerpt = &hits[0].excerpts[0];
        let span = excerpt.spans[0];
        assert_eq!(&excerpt.text[span.start..span.end], "beans");
    }

    #[test]
    fn test_duplicate_query_terms_count_once() {
        let engine = indexed(&[
            ("once.md", "echo and something else"),
            ("other.md", "entirely different text"),
        ]);
        let single = search(&engine, "echo");
        let repeated = search(&engine, "echo echo echo");

        assert_eq!(single.len(), repeated.len());
        assert_eq!(single[0].score, repeated[0].score);
    }
}
