//! Error types for conversation mutation.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while rewriting a conversation file in place.
///
/// Every variant leaves the original file untouched: the backup is
/// taken before any read for mutation, and the write itself goes
/// through a temp-file rename.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("failed to back up {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("conversation unreadable at mutation time: {0}")]
    Parse(#[from] frugal_store::StoreError),

    #[error("target message in {path} changed since analysis, aborting")]
    StaleTarget { path: PathBuf },

    #[error("failed to write optimized conversation to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
