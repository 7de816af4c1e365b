//! The sync pipeline.
//!
//! Phases run strictly in order:
//!
//! 1. [`read_previous`](Pipeline::read_previous) — last-synced record lookup
//! 2. [`fetch_source`](Pipeline::fetch_source) — sparse, shallow source clone
//! 3. [`extract_patch`](Pipeline::extract_patch) — delta since last sync
//! 4. [`fetch_target`](Pipeline::fetch_target) /
//!    [`apply_patch`](Pipeline::apply_patch) /
//!    [`push_target`](Pipeline::push_target) — skipped on an empty patch
//! 5. [`record`](Pipeline::record) — persist the new source head
//!
//! [`Pipeline::run`] composes all five and is the canonical entrypoint; the
//! CLI calls the phases individually to wrap each in a CI log group.

use std::path::{Path, PathBuf};

use serde::Serialize;

use subsync_core::{Config, SyncRecord};
use subsync_git::{CommandExecutor, GitRepo};
use subsync_store::SyncStateStore;

use crate::error::{io_err, SyncError};
use crate::patch::{patch_has_changes, strip_components, PatchOutcome};

const SOURCE_DIR: &str = "source";
const TARGET_DIR: &str = "target";
const PATCH_FILE: &str = "patch";

/// The fetched source working copy's head commit.
#[derive(Debug, Clone)]
pub struct SourceCheckout {
    pub head_sha: String,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// Newest source commit, now recorded in the store.
    pub source_head: String,
    /// The record found at startup, `None` on a first-ever sync.
    pub previous: Option<SyncRecord>,
    /// Whether a patch was applied and pushed (false: nothing to do).
    pub applied: bool,
}

/// One sync run's state: config, state store, executor, scratch workdir.
pub struct Pipeline<'a, S, E> {
    config: &'a Config,
    store: S,
    executor: E,
    workdir: PathBuf,
}

impl<'a, S, E> Pipeline<'a, S, E>
where
    S: SyncStateStore,
    E: CommandExecutor + Clone,
{
    pub fn new(config: &'a Config, store: S, executor: E, workdir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            store,
            executor,
            workdir: workdir.into(),
        }
    }

    /// Phase 1: look up the last completed sync for this relationship.
    pub fn read_previous(&self) -> Result<Option<SyncRecord>, SyncError> {
        let record = self.store.read(&self.config.tag())?;
        match &record {
            Some(prev) => tracing::info!("last sync commit was {}", prev.sha),
            None => tracing::info!("no previous sync record; assuming first ever sync"),
        }
        Ok(record)
    }

    /// Phase 2: produce a fresh sparse checkout of the source subdirectory.
    ///
    /// When a previous sync is known its date bounds the fetch
    /// (`--shallow-since`); otherwise the branch is fetched whole.
    pub fn fetch_source(
        &self,
        previous: Option<&SyncRecord>,
    ) -> Result<SourceCheckout, SyncError> {
        let repo = self.source_repo();
        prepare_dir(repo.path())?;

        repo.init()?;
        repo.add_remote(&self.config.source_url())?;
        repo.fetch(
            &self.config.source_branch,
            previous.map(|prev| prev.synced_at.as_str()),
        )?;
        repo.sparse_checkout(&self.config.source.dir)?;
        repo.pull(&self.config.source_branch)?;

        let head_sha = repo.head_sha()?;
        tracing::info!("newest source commit: {head_sha}");
        Ok(SourceCheckout { head_sha })
    }

    /// Phase 3: write the patch covering commits since the last sync,
    /// restricted to the source subdirectory, and apply the size policy.
    pub fn extract_patch(
        &self,
        previous: Option<&SyncRecord>,
    ) -> Result<PatchOutcome, SyncError> {
        let patch = self.source_repo().format_patch(
            previous.map(|prev| prev.sha.as_str()),
            &self.config.source.dir,
        )?;

        let path = self.patch_path();
        std::fs::write(&path, &patch).map_err(|e| io_err(&path, e))?;

        if !patch_has_changes(patch.len() as u64) {
            tracing::info!("no patch to apply");
            return Ok(PatchOutcome::Empty);
        }
        tracing::debug!("patch is {} bytes", patch.len());
        Ok(PatchOutcome::Changes { path })
    }

    /// Phase 4a: fresh shallow clone of the target branch.
    pub fn fetch_target(&self) -> Result<(), SyncError> {
        let repo = self.target_repo();
        prepare_dir(repo.path())?;

        repo.init()?;
        repo.add_remote(&self.config.target_url())?;
        repo.pull_shallow(&self.config.target_branch)?;
        Ok(())
    }

    /// Phase 4b: replay the patch onto the target, remapping the source
    /// subdirectory prefix onto the target subdirectory.
    pub fn apply_patch(&self, patch: &Path) -> Result<(), SyncError> {
        let strip = strip_components(&self.config.source.dir);
        let directory = self
            .config
            .target
            .has_dir()
            .then_some(self.config.target.dir.as_str());
        self.target_repo().apply_mailbox(patch, strip, directory)?;
        Ok(())
    }

    /// Phase 4c: publish the amended target branch. Never a force push; a
    /// conflicting remote history fails the run.
    pub fn push_target(&self) -> Result<(), SyncError> {
        self.target_repo().push(&self.config.target_branch)?;
        Ok(())
    }

    /// Phase 5: persist `head_sha` as this relationship's new high-water
    /// mark. Runs whether or not a patch was applied.
    pub fn record(&mut self, head_sha: &str) -> Result<(), SyncError> {
        self.store.write(&self.config.tag(), head_sha)?;
        Ok(())
    }

    /// Run the whole pipeline.
    pub fn run(&mut self) -> Result<SyncOutcome, SyncError> {
        let previous = self.read_previous()?;
        let checkout = self.fetch_source(previous.as_ref())?;
        let outcome = self.extract_patch(previous.as_ref())?;

        let applied = match &outcome {
            PatchOutcome::Changes { path } => {
                self.fetch_target()?;
                self.apply_patch(path)?;
                self.push_target()?;
                true
            }
            PatchOutcome::Empty => false,
        };

        self.record(&checkout.head_sha)?;
        Ok(SyncOutcome {
            source_head: checkout.head_sha,
            previous,
            applied,
        })
    }

    /// Absolute path of the extracted patch file.
    pub fn patch_path(&self) -> PathBuf {
        self.workdir.join(PATCH_FILE)
    }

    fn source_repo(&self) -> GitRepo<E> {
        GitRepo::with_executor(self.workdir.join(SOURCE_DIR), self.executor.clone())
    }

    fn target_repo(&self) -> GitRepo<E> {
        GitRepo::with_executor(self.workdir.join(TARGET_DIR), self.executor.clone())
    }
}

/// Clones are ephemeral: a directory left over from an aborted run is
/// removed and recreated.
fn prepare_dir(dir: &Path) -> Result<(), SyncError> {
    if dir.exists() {
        tracing::debug!("removing stale clone at {}", dir.display());
        std::fs::remove_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    Ok(())
}
