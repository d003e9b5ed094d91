//! Error types for the catalog.

use std::path::PathBuf;

/// Errors from code-block lookup and catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No code block has this id. Maps to HTTP 404.
    #[error("code block {0} not found")]
    NotFound(String),

    /// The backing store failed. Maps to HTTP 500.
    #[error("catalog storage failure: {0}")]
    Storage(String),

    /// A catalog file could not be read.
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A catalog file is not a JSON array of code blocks.
    #[error("invalid catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}
