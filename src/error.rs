//! Error types for the Magpie library.
//!
//! All fallible operations return [`MagpieError`] through the crate-wide
//! [`Result`] alias. Per-note failures (an unreadable file, malformed
//! content) are recoverable and stay local to the operation that hit them;
//! only genuine misuse or I/O trouble surfaces to the caller.
//!
//! # Examples
//!
//! ```
//! use magpie::error::{MagpieError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MagpieError::query("empty term list"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Magpie operations.
#[derive(Error, Debug)]
pub enum MagpieError {
    /// I/O errors (reading note content, walking the vault).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A note's content could not be read. Recovered locally: the note is
    /// left out of the index (or its previous revision kept) and the
    /// operation is reported as an index miss, not a failure.
    #[error("note '{path}' is unreadable: {reason}")]
    UnreadableNote {
        /// Path of the note that could not be read.
        path: String,
        /// Human-readable reason from the content accessor.
        reason: String,
    },

    /// A query arrived before the initial index build completed.
    #[error("index is not ready for queries (state: {state})")]
    IndexNotReady {
        /// Name of the lifecycle state the engine was in.
        state: &'static str,
    },

    /// Index-related errors (invariant violations, misuse).
    #[error("index error: {0}")]
    Index(String),

    /// Analysis-related errors (tokenization, filtering).
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Query-related errors.
    #[error("query error: {0}")]
    Query(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`MagpieError`].
pub type Result<T> = std::result::Result<T, MagpieError>;

impl MagpieError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        MagpieError::Index(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        MagpieError::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        MagpieError::Query(msg.into())
    }

    /// Create a new unreadable-note error.
    pub fn unreadable<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        MagpieError::UnreadableNote {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new not-ready error for the given lifecycle state name.
    pub fn not_ready(state: &'static str) -> Self {
        MagpieError::IndexNotReady { state }
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MagpieError::Other(msg.into())
    }

    /// Whether this error is a per-note failure that batch operations
    /// (initial build, flush) recover from instead of aborting.
    pub fn is_note_local(&self) -> bool {
        matches!(self, MagpieError::UnreadableNote { .. })
    }
}
