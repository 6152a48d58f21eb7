//! Tokenizers that split note text into tokens.
//!
//! The default tokenizer splits on Unicode word boundaries (UAX #29) and
//! drops segments with no alphanumeric content, so punctuation and
//! whitespace never reach the index. A whitespace tokenizer exists as the
//! degraded-mode fallback: indexing a note must never abort because its
//! text defeated word segmentation.
//!
//! # Examples
//!
//! ```
//! use magpie::analysis::tokenizer::{Tokenizer, WordTokenizer};
//!
//! let tokenizer = WordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world!").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].text, "Hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

use std::sync::Arc;

use log::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A tokenizer that splits text on Unicode word boundaries.
///
/// Word boundaries follow the Unicode Text Segmentation algorithm (UAX #29),
/// so apostrophes, CJK runs, and combining sequences are handled correctly.
/// Segments without a single alphanumeric character are discarded; positions
/// are assigned to the surviving tokens only.
///
/// Byte offsets are tracked with a running cursor over the segment stream,
/// so repeated words each get the offset of their own occurrence.
#[derive(Clone, Debug, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Create a new word tokenizer.
    pub fn new() -> Self {
        WordTokenizer
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut offset = 0;
        let mut position = 0;

        for segment in text.split_word_bounds() {
            let start = offset;
            offset += segment.len();

            if segment.chars().any(char::is_alphanumeric) {
                tokens.push(Token::with_offsets(segment, position, start, offset));
                position += 1;
            }
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

/// A tokenizer that splits text on whitespace.
///
/// This is the degraded-mode tokenizer: no boundary analysis, no filtering
/// beyond whitespace runs. Every non-whitespace run becomes a token.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;
        let mut position = 0;

        for (idx, ch) in text.char_indices() {
            if ch.is_whitespace() {
                if let Some(s) = start.take() {
                    tokens.push(Token::with_offsets(&text[s..idx], position, s, idx));
                    position += 1;
                }
            } else if start.is_none() {
                start = Some(idx);
            }
        }
        if let Some(s) = start {
            tokens.push(Token::with_offsets(&text[s..], position, s, text.len()));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

/// A tokenizer that falls back to a secondary tokenizer on failure.
///
/// Indexing must survive any note content, so the analysis pipeline wraps
/// its primary tokenizer in this adapter. A failure of the primary is
/// logged as a warning and the fallback runs over the same text.
#[derive(Clone)]
pub struct FallbackTokenizer {
    primary: Arc<dyn Tokenizer>,
    fallback: Arc<dyn Tokenizer>,
}

impl FallbackTokenizer {
    /// Create a fallback tokenizer wrapping the given primary and fallback.
    pub fn new(primary: Arc<dyn Tokenizer>, fallback: Arc<dyn Tokenizer>) -> Self {
        FallbackTokenizer { primary, fallback }
    }
}

impl Tokenizer for FallbackTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        match self.primary.tokenize(text) {
            Ok(tokens) => Ok(tokens),
            Err(err) => {
                warn!(
                    "tokenizer '{}' failed ({err}), falling back to '{}'",
                    self.primary.name(),
                    self.fallback.name()
                );
                self.fallback.tokenize(text)
            }
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
