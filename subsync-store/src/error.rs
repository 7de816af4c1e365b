//! Error types for subsync-store.

use thiserror::Error;

/// All errors that can arise from the sync-state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configured gist id does not exist (or the token cannot see it).
    /// Treated as a configuration error: the run aborts before any git work.
    #[error("gist with id {gist_id} cannot be found")]
    NotFound { gist_id: String },

    /// Non-success response from the gist API.
    #[error("gist API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    /// The response body could not be read or decoded.
    #[error("failed to decode gist response: {0}")]
    Decode(#[from] std::io::Error),
}
