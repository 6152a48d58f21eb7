//! Analyzers that combine a tokenizer with a chain of filters.
//!
//! # Examples
//!
//! ```
//! use magpie::analysis::analyzer::{Analyzer, note_analyzer};
//!
//! let analyzer = note_analyzer();
//! let tokens: Vec<_> = analyzer.analyze("Héllo WORLD").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{DiacriticFoldFilter, Filter, LowercaseFilter};
use crate::analysis::tokenizer::{
    FallbackTokenizer, Tokenizer, WhitespaceTokenizer, WordTokenizer,
};
use crate::error::Result;

/// Trait for analyzers that turn raw text into a token stream.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text into a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &str;
}

/// An analyzer that runs a tokenizer followed by a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut stream = self.tokenizer.tokenize(text)?;
        for filter in &self.filters {
            stream = filter.filter(stream)?;
        }
        Ok(stream)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Build the analyzer used for both note content and query text.
///
/// The pipeline is Unicode word segmentation (with a whitespace fallback so
/// indexing never aborts on hostile input), lowercasing, and diacritic
/// folding. Notes and queries must go through the same pipeline or folded
/// terms would never match.
pub fn note_analyzer() -> PipelineAnalyzer {
    let tokenizer = FallbackTokenizer::new(
        Arc::new(WordTokenizer::new()),
        Arc::new(WhitespaceTokenizer::new()),
    );
    PipelineAnalyzer::new(Arc::new(tokenizer))
        .add_filter(Arc::new(LowercaseFilter::new()))
        .add_filter(Arc::new(DiacriticFoldFilter::new()))
        .with_name("note")
}
