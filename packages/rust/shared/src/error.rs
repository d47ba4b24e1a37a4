//! Error types for chaptervec.
//!
//! Library crates use [`ChapterVecError`] via `thiserror`. The CLI wraps
//! this with `color-eyre` for rich diagnostics. Embedding failures have
//! their own typed error in the embedder crate since the pipeline treats
//! them as per-window events rather than propagated errors.

use std::path::PathBuf;

/// Top-level error type for all chaptervec operations.
#[derive(Debug, thiserror::Error)]
pub enum ChapterVecError {
    /// Configuration loading or validation error. Fatal at startup.
    #[error("config error: {message}")]
    Config { message: String },

    /// Chapter header extraction error (e.g., no digits in a file name).
    #[error("chapter parse error: {message}")]
    ChapterParse { message: String },

    /// Database or storage layer error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ChapterVecError>;

impl ChapterVecError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a chapter parse error from any displayable message.
    pub fn chapter_parse(msg: impl Into<String>) -> Self {
        Self::ChapterParse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
