//! Per-note records kept alongside the inverted index.
//!
//! A [`NoteRecord`] is the canonical, derived view of one note: its title,
//! raw content, analyzed tokens (with byte offsets for excerpts), and the
//! distinct terms posted for it. The record's `indexed_terms` list is what
//! makes replace-then-insert and removal exact: every posting written for a
//! note is reachable from its record, so purging the record purges the
//! postings.

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::error::Result;

/// The derived record for one indexed note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Vault-relative path, the note's identity.
    pub path: String,

    /// Display title: first `# ` heading, or the file stem.
    pub title: String,

    /// Raw note content as read from the source.
    pub content: String,

    /// Analyzed content tokens with byte offsets into `content`.
    pub tokens: Vec<Token>,

    /// Distinct terms posted for this note (content and title), sorted.
    pub indexed_terms: Vec<String>,

    /// Number of content tokens, used for length normalization.
    pub token_count: u32,

    /// Reindex counter for this path, starting at 0.
    pub revision: u64,

    /// When this record was last (re)built.
    pub last_indexed: DateTime<Utc>,
}

/// Where one term occurs within one note.
#[derive(Debug, Clone, Default)]
pub struct TermOccurrences {
    /// Ordinal content token positions.
    pub positions: Vec<u32>,

    /// Number of occurrences in the title.
    pub title_count: u32,
}

impl NoteRecord {
    /// Analyze a note and build its record plus per-term occurrences.
    ///
    /// The occurrence map is returned separately because it is only needed
    /// while writing postings; the record itself keeps the lighter
    /// `indexed_terms` list for later purging.
    pub fn build(
        path: &str,
        content: &str,
        analyzer: &dyn Analyzer,
    ) -> Result<(NoteRecord, AHashMap<String, TermOccurrences>)> {
        let title = derive_title(path, content);
        let tokens: Vec<Token> = analyzer.analyze(content)?.collect();
        let title_tokens: Vec<Token> = analyzer.analyze(&title)?.collect();

        let occurrences = collect_occurrences(&tokens, &title_tokens);
        let mut indexed_terms: Vec<String> = occurrences.keys().cloned().collect();
        indexed_terms.sort();

        let record = NoteRecord {
            path: path.to_string(),
            title,
            content: content.to_string(),
            token_count: tokens.len() as u32,
            tokens,
            indexed_terms,
            revision: 0,
            last_indexed: Utc::now(),
        };
        Ok((record, occurrences))
    }
}

/// Derive a display title from note content, falling back to the file stem.
pub fn derive_title(path: &str, content: &str) -> String {
    for line in content.lines() {
        if let Some(rest) = line.trim_start().strip_prefix("# ") {
            let title = rest.trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
    }
    file_stem(path)
}

fn file_stem(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Group analyzed tokens into per-term occurrences.
///
/// Content tokens contribute positions; title tokens contribute only a
/// count, so title matches can boost scores without fabricating content
/// positions that excerpts would then chase.
pub fn collect_occurrences(
    content_tokens: &[Token],
    title_tokens: &[Token],
) -> AHashMap<String, TermOccurrences> {
    let mut map: AHashMap<String, TermOccurrences> = AHashMap::new();
    for token in content_tokens {
        map.entry(token.text.clone())
            .or_default()
            .positions
            .push(token.position as u32);
    }
    for token in title_tokens {
        map.entry(token.text.clone()).or_default().title_count += 1;
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::note_analyzer;

    #[test]
    fn test_title_from_first_heading() {
        assert_eq!(
            derive_title("notes/x.md", "# Coffee Brewing\n\nbody"),
            "Coffee Brewing"
        );
    }

    #[test]
    fn test_title_skips_non_headings() {
        assert_eq!(
            derive_title("notes/x.md", "intro text\n\n# Real Title\n"),
            "Real Title"
        );
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        assert_eq!(
            derive_title("notes/daily log.md", "no headings here"),
            "daily log"
        );
        assert_eq!(derive_title("bare", ""), "bare");
    }

    #[test]
    fn test_empty_heading_does_not_count() {
        assert_eq!(derive_title("a.md", "#  \nbody"), "a");
    }

    #[test]
    fn test_build_collects_distinct_terms() {
        let analyzer = note_analyzer();
        let (record, occurrences) =
            NoteRecord::build("fruit.md", "# Apples\n\napple apple banana", &analyzer).unwrap();

        assert_eq!(record.title, "Apples");
        assert_eq!(record.token_count, 4);
        assert_eq!(record.indexed_terms, vec!["apple", "apples", "banana"]);

        let apple = &occurrences["apple"];
        assert_eq!(apple.positions, vec![1, 2]);
        assert_eq!(apple.title_count, 0);

        // The heading line is content too, so "apples" has a content
        // position as well as a title occurrence.
        let apples = &occurrences["apples"];
        assert_eq!(apples.positions, vec![0]);
        assert_eq!(apples.title_count, 1);
    }

    #[test]
    fn test_stem_title_occurrences_have_no_content_positions() {
        let analyzer = note_analyzer();
        let (record, occurrences) =
            NoteRecord::build("meeting-notes.md", "plain body", &analyzer).unwrap();

        assert_eq!(record.title, "meeting-notes");
        let meeting = &occurrences["meeting"];
        assert!(meeting.positions.is_empty());
        assert_eq!(meeting.title_count, 1);
    }
}
