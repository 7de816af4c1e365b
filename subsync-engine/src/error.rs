//! Error types for subsync-engine.

use std::path::PathBuf;

use thiserror::Error;

use subsync_git::GitError;
use subsync_store::StoreError;

/// All errors that can arise from a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Sync-state store failure (gist missing, API error).
    #[error("sync-state store error: {0}")]
    Store(#[from] StoreError),

    /// An external git command failed or could not be spawned.
    #[error("git error: {0}")]
    Git(#[from] GitError),

    /// Workdir housekeeping (clone directories, the patch file).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
