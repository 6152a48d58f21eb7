//! Token filters that normalize token text.
//!
//! Filters rewrite the `text` of each token while leaving positions and byte
//! offsets untouched, so the index sees normalized terms but excerpts still
//! slice the original note text.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A filter that converts token text to lowercase.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered = tokens.map(|mut token| {
            if token.text.chars().any(char::is_uppercase) {
                token.text = token.text.to_lowercase();
            }
            token
        });
        Ok(Box::new(filtered))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// A filter that strips diacritical marks from token text.
///
/// Folding works by decomposing to NFD and dropping combining marks, so
/// `café` and `cafe` index to the same term. Running this per token, after
/// tokenization, keeps the byte offsets valid for the original text even
/// though folding changes byte lengths.
#[derive(Clone, Debug, Default)]
pub struct DiacriticFoldFilter;

impl DiacriticFoldFilter {
    /// Create a new diacritic folding filter.
    pub fn new() -> Self {
        DiacriticFoldFilter
    }

    fn fold(text: &str) -> String {
        text.nfd().filter(|c| !is_combining_mark(*c)).collect()
    }
}

impl Filter for DiacriticFoldFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered = tokens.map(|mut token| {
            // ASCII text has nothing to fold, skip the decomposition.
            if !token.text.is_ascii() {
                token.text = Self::fold(&token.text);
            }
            token
        });
        Ok(Box::new(filtered))
    }

    fn name(&self) -> &'static str {
        "diacritic_fold"
    }
}
