//! Error types for codestatslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a statistics run.
///
/// Failures tied to a single file (unreadable file, Python syntax error,
/// unterminated C body) never surface here; the file is skipped instead.
#[derive(Error, Debug)]
pub enum CodestatsError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Config file could not be read or parsed
    #[error("invalid config '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// Worker pool could not be built
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
