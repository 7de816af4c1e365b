//! Error types for subsync-git.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from running external commands.
///
/// Rendered command lines have remote-URL credentials redacted; they end up
/// in CI logs.
#[derive(Debug, Error)]
pub enum GitError {
    /// The process could not be spawned at all.
    #[error("failed to run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited non-zero.
    #[error("`{command}` failed with code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Filesystem work around a repository (sparse-checkout file, workdir).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`GitError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> GitError {
    GitError::Io {
        path: path.into(),
        source,
    }
}
