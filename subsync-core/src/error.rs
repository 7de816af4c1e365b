//! Error types for subsync-core.

use thiserror::Error;

/// Errors raised while resolving configuration, before any network or
/// subprocess work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable (or CLI override) was absent.
    #[error("required input {name} is not set")]
    MissingInput { name: &'static str },

    /// A repository spec did not have at least `org/repo`.
    #[error("invalid repository spec '{input}': expected org/repo[/sub/dir...]")]
    InvalidSpec { input: String },
}
