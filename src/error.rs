//! Error types for Weft
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow`.
//! Only [`WeftError::Discovery`] is fatal to a graph build. Everything the
//! graph hits per document (extraction, resolution) is downgraded to a
//! [`crate::graph::GraphWarning`] by the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Weft operations
pub type WeftResult<T> = Result<T, WeftError>;

/// Main error type for Weft operations
#[derive(Error, Debug)]
pub enum WeftError {
    /// The document root cannot be scanned
    #[error("cannot scan document root {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    /// Invalid frontmatter YAML
    #[error("invalid frontmatter in {file}: {message}")]
    InvalidFrontmatter { file: PathBuf, message: String },

    /// Frontmatter not properly closed
    #[error("unclosed frontmatter in {file} - missing closing '---'")]
    UnclosedFrontmatter { file: PathBuf },

    /// An import reference could not be mapped to a file
    #[error("cannot resolve import '{reference}' from {base_dir}")]
    UnresolvedImport { reference: String, base_dir: PathBuf },

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// File watcher failure
    #[error("watch error: {0}")]
    Watch(String),

    /// The external compiler failed for a document
    #[error("compile failed for {path}: {message}")]
    Compile { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<notify::Error> for WeftError {
    fn from(err: notify::Error) -> Self {
        WeftError::Watch(err.to_string())
    }
}
