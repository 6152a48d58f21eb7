//! Token types produced by the analysis pipeline.
//!
//! A [`Token`] is a single unit of analyzed text. It carries the (possibly
//! rewritten) token text, its 0-based position in the token stream, and the
//! byte offsets of the original surface form in the source text.
//!
//! # Examples
//!
//! ```
//! use magpie::analysis::token::Token;
//!
//! let token = Token::with_offsets("hello", 0, 4, 9);
//! assert_eq!(token.text, "hello");
//! assert_eq!(token.position, 0);
//! assert_eq!(token.start_offset, 4);
//! assert_eq!(token.end_offset, 9);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single analyzed token.
///
/// Filters may rewrite `text` (lowercasing, diacritic folding) but must leave
/// `start_offset` and `end_offset` pointing at the original surface form so
/// that excerpt generation can slice the source text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token.
    pub text: String,

    /// The position of the token in the token stream (0-based).
    pub position: usize,

    /// The byte offset where this token starts in the original text.
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text.
    pub end_offset: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        let end_offset = text.len();
        Token {
            text,
            position,
            start_offset: 0,
            end_offset,
        }
    }

    /// Create a new token with explicit byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Replace the token text, keeping position and offsets.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    /// Length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check whether the token text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.text, self.position)
    }
}

/// A stream of tokens produced by analysis.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_new() {
        let token = Token::new("hello", 3);
        assert_eq!(token.text, "hello");
        assert_eq!(token.position, 3);
        assert_eq!(token.start_offset, 0);
        assert_eq!(token.end_offset, 5);
    }

    #[test]
    fn test_token_with_offsets() {
        let token = Token::with_offsets("world", 1, 6, 11);
        assert_eq!(token.position, 1);
        assert_eq!(token.start_offset, 6);
        assert_eq!(token.end_offset, 11);
    }

    #[test]
    fn test_token_with_text_keeps_offsets() {
        let token = Token::with_offsets("Café", 0, 10, 15).with_text("cafe");
        assert_eq!(token.text, "cafe");
        assert_eq!(token.start_offset, 10);
        assert_eq!(token.end_offset, 15);
    }

    #[test]
    fn test_token_display() {
        let token = Token::new("note", 7);
        assert_eq!(format!("{token}"), "note@7");
    }

    #[test]
    fn test_token_serde_round_trip() {
        let token = Token::with_offsets("vault", 2, 8, 13);
        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
