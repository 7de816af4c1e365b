//! `subsync sync` — run one mirror pass.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use subsync_core::Config;
use subsync_engine::{PatchOutcome, Pipeline, SyncOutcome};
use subsync_git::ProcessCommandExecutor;
use subsync_store::{GistClient, GistStore};

use crate::commands::ConfigArgs;
use crate::gha;

/// Arguments for `subsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Directory for the ephemeral clones and the patch file
    /// (default: current directory).
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Emit a machine-readable JSON summary after the run.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        gha::group("Config sanity checks");
        let config = self.config.resolve()?;
        print_endpoints(&config);
        if config.testing {
            gha::info("testing mode is on; will rewind repositories on failure");
        }
        let store = GistStore::open(GistClient::new(config.token.clone()), &config.gist_id)?;
        gha::end_group();

        let workdir = match self.workdir {
            Some(dir) => dir,
            None => std::env::current_dir().context("could not determine working directory")?,
        };
        let mut pipeline = Pipeline::new(&config, store, ProcessCommandExecutor, &workdir);

        gha::group("Determining previous sync commit");
        let previous = pipeline.read_previous()?;
        match &previous {
            Some(prev) => gha::info(format_args!(
                "last sync commit was {} on {}",
                prev.sha, prev.synced_at
            )),
            None => gha::info("last sync commit not found, assuming first ever sync"),
        }
        gha::end_group();

        gha::group("Checking out source repo");
        let checkout = pipeline.fetch_source(previous.as_ref())?;
        gha::info(format_args!("newest source commit: {}", checkout.head_sha));
        gha::end_group();

        gha::group("Getting source patch");
        let patch = pipeline.extract_patch(previous.as_ref())?;
        match &patch {
            PatchOutcome::Changes { path } => {
                gha::info("patch to apply:");
                gha::debug(format_args!("patch file: {}", path.display()));
            }
            PatchOutcome::Empty => gha::info("no patch to apply"),
        }
        gha::end_group();

        gha::group("Checking out target repo");
        match &patch {
            PatchOutcome::Changes { .. } => pipeline.fetch_target()?,
            PatchOutcome::Empty => gha::info("skipped (no patch)"),
        }
        gha::end_group();

        gha::group("Applying patch to target");
        match &patch {
            PatchOutcome::Changes { path } => pipeline.apply_patch(path)?,
            PatchOutcome::Empty => gha::info("skipped (no patch)"),
        }
        gha::end_group();

        gha::group("Pushing to target");
        match &patch {
            PatchOutcome::Changes { .. } => pipeline.push_target()?,
            PatchOutcome::Empty => gha::info("skipped (no patch)"),
        }
        gha::end_group();

        gha::group("Update most recent successful sync commit");
        pipeline.record(&checkout.head_sha)?;
        gha::end_group();

        if self.json {
            let outcome = SyncOutcome {
                source_head: checkout.head_sha,
                previous,
                applied: matches!(patch, PatchOutcome::Changes { .. }),
            };
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Ok(())
    }
}

fn print_endpoints(config: &Config) {
    gha::info(format_args!(
        "source: repo {} dir {} branch {}",
        config.source.repo,
        display_dir(&config.source.dir),
        config.source_branch,
    ));
    gha::info(format_args!(
        "target: repo {} dir {} branch {}",
        config.target.repo,
        display_dir(&config.target.dir),
        config.target_branch,
    ));
}

fn display_dir(dir: &str) -> &str {
    if dir.is_empty() {
        "{NONE}"
    } else {
        dir
    }
}
