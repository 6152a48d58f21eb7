//! Excerpt selection and highlighting.
//!
//! Excerpts are cut from the original note content, never from normalized
//! token text, so the user sees what they wrote. Token byte offsets
//! recorded at analysis time make that possible after lowercasing and
//! diacritic folding have rewritten the terms.
//!
//! Selection is greedy: repeatedly take the window of `max_chars` bytes
//! covering the most matched occurrences, widen it outward to word
//! boundaries, and drop the covered occurrences before looking for the
//! next window.

use ahash::AHashSet;

use crate::config::ExcerptConfig;
use crate::index::record::NoteRecord;
use crate::search::{Excerpt, MatchSpan};

/// Build up to `config.max_per_note` excerpts for a matching note.
///
/// `matched_terms` are normalized index terms; any content token whose
/// term is in the set becomes a highlighted span. A note matched only via
/// its title has no content occurrences and falls back to a single
/// excerpt from the head of the content, with no spans.
pub fn build_excerpts(
    record: &NoteRecord,
    matched_terms: &AHashSet<String>,
    config: &ExcerptConfig,
) -> Vec<Excerpt> {
    if config.max_per_note == 0 {
        return Vec::new();
    }

    let mut occurrences: Vec<(usize, usize)> = record
        .tokens
        .iter()
        .filter(|token| matched_terms.contains(&token.text))
        .map(|token| (token.start_offset, token.end_offset))
        .collect();
    occurrences.sort_unstable();

    if occurrences.is_empty() {
        return head_excerpt(&record.content, config)
            .map(|e| vec![e])
            .unwrap_or_default();
    }

    let content = record.content.as_str();
    let mut excerpts = Vec::new();

    while !occurrences.is_empty() && excerpts.len() < config.max_per_note {
        let (anchor, count) = densest_window(&occurrences, config.max_chars);
        let covered = &occurrences[anchor..anchor + count];
        let first_start = covered[0].0;
        let last_end = covered[count - 1].1;

        // Center the cluster in the window, then widen to word boundaries.
        let slack = config.max_chars.saturating_sub(last_end - first_start);
        let raw_start = first_start.saturating_sub(slack / 2);
        let raw_end = (raw_start + config.max_chars).min(content.len()).max(last_end.min(content.len()));
        let start = align_start(content, raw_start);
        let end = align_end(content, raw_end);

        let text = content[start..end].trim_end();
        let end = start + text.len();
        let lead = text.len() - text.trim_start().len();
        let start = start + lead;
        let text = &content[start..end];

        let spans: Vec<MatchSpan> = occurrences
            .iter()
            .filter(|&&(s, e)| s < end && e > start)
            .map(|&(s, e)| MatchSpan {
                start: s.max(start) - start,
                end: e.min(end) - start,
            })
            .collect();

        excerpts.push(Excerpt {
            start,
            text: text.to_string(),
            spans,
        });

        occurrences.retain(|&(s, _)| !(s >= start && s < end));
    }

    excerpts
}

/// Pick the window anchor covering the most occurrences.
///
/// Returns `(index, count)`: the occurrence to anchor at and how many
/// occurrences fit in a `max_chars` window starting there. Earliest anchor
/// wins ties, so output is deterministic.
fn densest_window(occurrences: &[(usize, usize)], max_chars: usize) -> (usize, usize) {
    let mut best = (0, 1);
    let mut right = 0;
    for left in 0..occurrences.len() {
        let limit = occurrences[left].0 + max_chars;
        if right < left {
            right = left;
        }
        while right < occurrences.len() && occurrences[right].1 <= limit {
            right += 1;
        }
        let count = (right - left).max(1);
        if count > best.1 {
            best = (left, count);
        }
    }
    best
}

fn head_excerpt(content: &str, config: &ExcerptConfig) -> Option<Excerpt> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let start = content.len() - trimmed.len();
    let raw_end = (start + config.max_chars).min(content.len());
    let end = align_end(content, raw_end);
    Some(Excerpt {
        start,
        text: content[start..end].trim_end().to_string(),
        spans: Vec::new(),
    })
}

/// Move a byte offset left to the start of the word it falls in.
fn align_start(content: &str, raw: usize) -> usize {
    let raw = floor_char_boundary(content, raw);
    if raw == 0 {
        return 0;
    }
    match content[..raw]
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
    {
        Some((idx, ch)) => idx + ch.len_utf8(),
        None => 0,
    }
}

/// Move a byte offset right to the end of the word it falls in.
fn align_end(content: &str, raw: usize) -> usize {
    let raw = ceil_char_boundary(content, raw);
    if raw >= content.len() {
        return content.len();
    }
    match content[raw..].find(char::is_whitespace) {
        Some(idx) => raw + idx,
        None => content.len(),
    }
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
