use std::path::PathBuf;
use thiserror::Error;

use crate::mt::MtError;

/// Errors that abort a sync run.
///
/// Per-item translation failures are not represented here: they are
/// recovered inside the batch translator and surface only as failure
/// outcomes and sentinel-marked values.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid or incomplete run configuration. Raised before any file is read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A locale file could not be read or written
    #[error("Failed to access locale file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A locale file is not valid JSON
    #[error("Failed to parse JSON from {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A locale file parsed, but is not a locale tree
    #[error("Invalid locale tree in {path}: {reason}")]
    InvalidTree { path: PathBuf, reason: String },

    /// The translation provider could not be constructed
    #[error("Translation provider error: {0}")]
    Provider(#[from] MtError),
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_tree(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidTree {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for SyncError
pub type SyncResult<T> = Result<T, SyncError>;
