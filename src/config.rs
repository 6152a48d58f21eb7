//! Runtime configuration for indexing and search.
//!
//! The host owns a [`SearchConfig`] and passes it into engine operations as
//! an immutable snapshot. No operation reads configuration from anywhere
//! else, so a host can swap settings between calls without tearing state
//! mid-operation. The whole tree is serde-serializable for persistence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What `search` does when the initial index build has not finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotReadyBehavior {
    /// Return a typed `IndexNotReady` error immediately.
    Error,
    /// Finish the remaining build inside the query call, then serve it.
    CatchUp,
}

/// Bounds for fuzzy term expansion.
///
/// Edit allowance scales with query term length so short terms stay exact:
/// no edits below `min_len_one_edit` chars, one edit below `min_len_two_edits`,
/// two edits from there on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Minimum term length (chars) before one edit is allowed.
    pub min_len_one_edit: usize,

    /// Minimum term length (chars) before two edits are allowed.
    pub min_len_two_edits: usize,

    /// Minimum term length (chars) for prefix expansion.
    pub min_prefix_len: usize,

    /// Maximum number of index terms one query term may expand to.
    pub max_expansions: usize,

    /// Match weight of an exact term hit.
    pub exact_weight: f32,

    /// Match weight of a prefix hit.
    pub prefix_weight: f32,

    /// Match weight of a fuzzy hit, scaled down further by edit distance.
    pub fuzzy_weight: f32,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        FuzzyConfig {
            min_len_one_edit: 4,
            min_len_two_edits: 6,
            min_prefix_len: 2,
            max_expansions: 50,
            exact_weight: 1.0,
            prefix_weight: 0.65,
            fuzzy_weight: 0.45,
        }
    }
}

impl FuzzyConfig {
    /// Maximum edit distance allowed for a query term of the given length.
    pub fn max_edits_for(&self, term_chars: usize) -> usize {
        if term_chars < self.min_len_one_edit {
            0
        } else if term_chars < self.min_len_two_edits {
            1
        } else {
            2
        }
    }

    /// Whether a query term of the given length may expand by prefix.
    pub fn prefix_allowed(&self, term_chars: usize) -> bool {
        term_chars >= self.min_prefix_len
    }
}

/// Weights for the ranking function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// BM25 term frequency saturation parameter.
    pub k1: f32,

    /// BM25 length normalization parameter.
    pub b: f32,

    /// Weight of the proximity bonus for terms that appear close together.
    pub proximity_weight: f32,

    /// Frequency weight multiplier for terms appearing in a note title.
    pub title_boost: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            k1: 1.2,
            b: 0.75,
            proximity_weight: 0.3,
            title_boost: 2.0,
        }
    }
}

/// Tuning for excerpt extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcerptConfig {
    /// Target excerpt width in bytes, aligned outward to word boundaries.
    pub max_chars: usize,

    /// Maximum number of excerpts reported per matching note.
    pub max_per_note: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        ExcerptConfig {
            max_chars: 160,
            max_per_note: 3,
        }
    }
}

/// Top-level engine configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Apply modifications immediately instead of debouncing them.
    pub reindex_in_real_time: bool,

    /// Settling window a debounced modification must survive before flush.
    pub debounce_window: Duration,

    /// File extensions (without dot) that participate in the index.
    pub indexable_extensions: Vec<String>,

    /// Behavior of `search` before the initial build completes.
    pub not_ready: NotReadyBehavior,

    /// Number of notes indexed per `build_step` call.
    pub build_chunk_size: usize,

    /// Maximum number of hits returned from a search.
    pub max_results: usize,

    /// Fuzzy expansion bounds.
    pub fuzzy: FuzzyConfig,

    /// Ranking weights.
    pub scoring: ScoringConfig,

    /// Excerpt tuning.
    pub excerpt: ExcerptConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            reindex_in_real_time: false,
            debounce_window: Duration::from_secs(2),
            indexable_extensions: vec!["md".to_string()],
            not_ready: NotReadyBehavior::CatchUp,
            build_chunk_size: 64,
            max_results: 50,
            fuzzy: FuzzyConfig::default(),
            scoring: ScoringConfig::default(),
            excerpt: ExcerptConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        SearchConfig::default()
    }

    /// Set whether modifications reindex immediately.
    pub fn with_real_time(mut self, enabled: bool) -> Self {
        self.reindex_in_real_time = enabled;
        self
    }

    /// Set the debounce settling window.
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// Set the not-ready query behavior.
    pub fn with_not_ready(mut self, behavior: NotReadyBehavior) -> Self {
        self.not_ready = behavior;
        self
    }

    /// Set the indexable file extensions (without dots).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexable_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a vault path has an indexable extension.
    pub fn is_indexable(&self, path: &str) -> bool {
        match path.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .indexable_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!(!config.reindex_in_real_time);
        assert_eq!(config.debounce_window, Duration::from_secs(2));
        assert_eq!(config.indexable_extensions, vec!["md".to_string()]);
        assert_eq!(config.not_ready, NotReadyBehavior::CatchUp);
        assert_eq!(config.scoring.k1, 1.2);
        assert_eq!(config.scoring.b, 0.75);
        assert_eq!(config.fuzzy.max_expansions, 50);
        assert_eq!(config.excerpt.max_chars, 160);
    }

    #[test]
    fn test_max_edits_scale_with_term_length() {
        let fuzzy = FuzzyConfig::default();
        assert_eq!(fuzzy.max_edits_for(3), 0);
        assert_eq!(fuzzy.max_edits_for(4), 1);
        assert_eq!(fuzzy.max_edits_for(5), 1);
        assert_eq!(fuzzy.max_edits_for(6), 2);
        assert_eq!(fuzzy.max_edits_for(12), 2);
    }

    #[test]
    fn test_prefix_allowed_threshold() {
        let fuzzy = FuzzyConfig::default();
        assert!(!fuzzy.prefix_allowed(1));
        assert!(fuzzy.prefix_allowed(2));
    }

    #[test]
    fn test_is_indexable() {
        let config = SearchConfig::default();
        assert!(config.is_indexable("notes/daily.md"));
        assert!(config.is_indexable("README.MD"));
        assert!(!config.is_indexable("image.png"));
        assert!(!config.is_indexable("no_extension"));
        assert!(!config.is_indexable(".hidden"));

        let config = config.with_extensions(["md", "txt"]);
        assert!(config.is_indexable("todo.txt"));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = SearchConfig::default()
            .with_real_time(true)
            .with_debounce_window(Duration::from_millis(500));
        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert!(back.reindex_in_real_time);
        assert_eq!(back.debounce_window, Duration::from_millis(500));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let back: SearchConfig = serde_json::from_str(r#"{"reindex_in_real_time": true}"#).unwrap();
        assert!(back.reindex_in_real_time);
        assert_eq!(back.debounce_window, Duration::from_secs(2));
        assert_eq!(back.max_results, 50);
    }
}
