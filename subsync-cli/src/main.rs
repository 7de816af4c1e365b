//! subsync — mirror a subdirectory of commits between repositories.
//!
//! # Usage
//!
//! ```text
//! subsync sync   [--source org/repo/dir] [--source-branch main]
//!                [--target org/repo/dir] [--target-branch main]
//!                [--gist <id>] [--workdir <path>] [--json]
//! subsync status [same config flags] [--json]
//! ```
//!
//! Inputs default to the CI environment variables (`INPUT_*`,
//! `GITHUB_ACTOR`); flags override them field by field.

mod commands;
mod gha;

use clap::{Parser, Subcommand};

use commands::{status::StatusArgs, sync::SyncArgs};
use subsync_core::{config, ConfigError};
use subsync_store::StoreError;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "subsync",
    version,
    about = "Mirror a subdirectory of commits from one repository into another",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one sync: fetch the source delta, replay it onto the target,
    /// record the new head.
    Sync(SyncArgs),

    /// Show the last recorded sync for the configured relationship.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Status(args) => args.run(),
    };

    if let Err(err) = result {
        gha::error(error_kind(&err), format_args!("{err:#}"));
        if testing_enabled() {
            rewind_repos();
        }
        std::process::exit(1);
    }
}

/// Marker kind for the failure: bad configuration vs. a failed step.
fn error_kind(err: &anyhow::Error) -> &'static str {
    let config_failure = err.chain().any(|cause| {
        cause.downcast_ref::<ConfigError>().is_some()
            || matches!(
                cause.downcast_ref::<StoreError>(),
                Some(StoreError::NotFound { .. })
            )
    });
    if config_failure {
        "config"
    } else {
        "command"
    }
}

/// Whether testing mode is on, readable even when config resolution itself
/// is what failed.
fn testing_enabled() -> bool {
    std::env::var(config::ENV_TESTING)
        .as_deref()
        .is_ok_and(config::flag_enabled)
}

/// Reset the clone directories after a failed run in testing mode.
///
/// Currently a no-op: clones are ephemeral and reset at the start of the
/// next run regardless.
fn rewind_repos() {
    gha::debug("rewind requested; clones are reset on the next run");
}
