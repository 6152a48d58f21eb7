//! Text analysis pipeline for note content.
//!
//! Analysis turns raw note text into a stream of normalized tokens that the
//! index engine can consume. The pipeline has three stages:
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Token Stream
//! ```
//!
//! Tokens keep their byte offsets into the original text so excerpts can be
//! cut from the note exactly as the author wrote it, even after lowercasing
//! and diacritic folding have rewritten the token text.
//!
//! The entry point for indexing and querying is [`note_analyzer`], which
//! wires up the default pipeline: Unicode word segmentation with a
//! whitespace fallback, lowercasing, and diacritic folding.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, note_analyzer};
pub use token::{Token, TokenStream};
pub use token_filter::{DiacriticFoldFilter, Filter, LowercaseFilter};
pub use tokenizer::{FallbackTokenizer, Tokenizer, WhitespaceTokenizer, WordTokenizer};
