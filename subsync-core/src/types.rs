//! Domain types for the sync pipeline.
//!
//! A sync relationship is identified by two [`RepoSpec`]s plus their branch
//! names; [`SyncTag`] renders that relationship as the line prefix under
//! which the last-synced commit is stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// RepoSpec
// ---------------------------------------------------------------------------

/// A repository plus an optional subdirectory, parsed from
/// `org/repo` or `org/repo/sub/dir...`.
///
/// `dir` never carries a leading or trailing slash; an empty `dir` means the
/// whole repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSpec {
    /// `org/repo` identifier as understood by the hosting service.
    pub repo: String,
    /// Subdirectory within the repository, or empty for the whole tree.
    pub dir: String,
}

impl RepoSpec {
    /// Whether this spec is restricted to a subdirectory.
    pub fn has_dir(&self) -> bool {
        !self.dir.is_empty()
    }
}

impl FromStr for RepoSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('/').filter(|seg| !seg.is_empty()).collect();
        if segments.len() < 2 {
            return Err(ConfigError::InvalidSpec {
                input: s.to_owned(),
            });
        }
        Ok(Self {
            repo: format!("{}/{}", segments[0], segments[1]),
            dir: segments[2..].join("/"),
        })
    }
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dir.is_empty() {
            write!(f, "{}", self.repo)
        } else {
            write!(f, "{}/{}", self.repo, self.dir)
        }
    }
}

// ---------------------------------------------------------------------------
// SyncTag
// ---------------------------------------------------------------------------

/// The composite key under which one sync relationship's record is stored.
///
/// Rendered as
/// `*SOURCE <spec> *SOURCE_BRANCH <branch> *TARGET <spec> *TARGET_BRANCH <branch> `
/// with a trailing space; the record value follows the tag on the same line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncTag(String);

impl SyncTag {
    pub fn new(
        source: &RepoSpec,
        source_branch: &str,
        target: &RepoSpec,
        target_branch: &str,
    ) -> Self {
        Self(format!(
            "*SOURCE {source} *SOURCE_BRANCH {source_branch} \
             *TARGET {target} *TARGET_BRANCH {target_branch} "
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SyncTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// SyncRecord
// ---------------------------------------------------------------------------

/// The value stored under a [`SyncTag`]: the last-synced commit and when the
/// sync completed (RFC 2822, the format git's `--shallow-since` accepts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub sha: String,
    pub synced_at: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
