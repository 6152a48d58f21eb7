//! # Magpie
//!
//! A full-text search engine for note vaults: folders of plain-text
//! notes that keep changing while you search them.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Incremental indexing driven by vault change events
//! - Unicode-aware analysis with case and diacritic folding
//! - Fuzzy and prefix term matching
//! - BM25 scoring with title boost and proximity bonus
//! - Debounced reindexing with focus-loss flush
//! - Highlighted excerpt extraction
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use magpie::prelude::*;
//!
//! let vault = Arc::new(MemoryVault::from_notes([
//!     ("fruit.md", "# Fruit\n\napples and bananas"),
//!     ("pie.md", "apple pie needs tart apples"),
//! ]));
//! let engine = SearchEngine::new(vault);
//! let config = SearchConfig::default();
//! engine.start_build(&config).unwrap();
//! engine.build_until_ready(&config).unwrap();
//!
//! let hits = engine.search("apple", &SearchScope::Vault, &config).unwrap();
//! assert_eq!(hits[0].path, "pie.md");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod reindex;
pub mod search;
pub mod util;
pub mod vault;

pub mod prelude {
    //! The types most hosts need, in one import.

    pub use crate::config::{NotReadyBehavior, SearchConfig};
    pub use crate::engine::{BuildProgress, FlushReport, IndexState, SearchEngine};
    pub use crate::error::{MagpieError, Result};
    pub use crate::index::IndexStats;
    pub use crate::search::{Excerpt, MatchSpan, SearchHit, SearchScope};
    pub use crate::vault::{
        signal_channel, FsVault, MemoryVault, NoteSource, VaultEvent, VaultSignal,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
