//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for application-level operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in the CLI, configuration and server layers.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a search index cannot be parsed or loaded.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A record is missing its key, its label, or every target.
    #[error("malformed record at position {position}: {reason}")]
    MalformedRecord { position: usize, reason: String },

    /// The search data is not a well-formed array literal.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// An index file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory was given but it holds no `<section>_<shard>.js` files.
    #[error("no search data shards found in {}", dir.display())]
    NoShards { dir: PathBuf },
}

impl IndexError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            position,
            reason: reason.into(),
        }
    }
}
